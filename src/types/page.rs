// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// The number of pages in the mushaf.
pub const PAGE_COUNT: u16 = 604;

/// A page number, from 1 to 604 inclusive.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(transparent)]
pub struct Page(u16);

impl Page {
    pub fn new(number: u16) -> Fallible<Self> {
        if number == 0 || number > PAGE_COUNT {
            return Err(ErrorReport::new(format!(
                "page {number} is out of range (1-{PAGE_COUNT})."
            )));
        }
        Ok(Self(number))
    }

    pub fn number(self) -> u16 {
        self.0
    }

    /// The page after this one, if there is one.
    pub fn next(self) -> Option<Page> {
        Page::new(self.0 + 1).ok()
    }
}

impl Display for Page {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Page {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number: u16 = s.trim().parse()?;
        Page::new(number)
    }
}

impl ToSql for Page {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(self.0)))
    }
}

impl FromSql for Page {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let number: i64 = FromSql::column_result(value)?;
        let number = u16::try_from(number).map_err(|_| FromSqlError::OutOfRange(number))?;
        Page::new(number).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
