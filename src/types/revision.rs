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

use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::date::Date;

/// A single revision of a page.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    /// The day the page was revised.
    pub date: Date,
    /// The number of words the reciter stumbled on.
    pub word_mistakes: u32,
    /// The number of lines the reciter needed prompting for.
    pub line_mistakes: u32,
    /// The interval, in days, that was scheduled when this revision was
    /// recorded. Zero for the first revision of a page.
    pub previous_interval: u32,
}

impl Revision {
    pub fn new(date: Date, word_mistakes: u32, line_mistakes: u32, previous_interval: u32) -> Self {
        Self {
            date,
            word_mistakes,
            line_mistakes,
            previous_interval,
        }
    }

    /// Build a revision from loosely typed row values.
    ///
    /// A missing interval is treated as zero. Negative counts and unparseable
    /// dates are rejected.
    pub fn from_raw(
        date: &str,
        word_mistakes: i64,
        line_mistakes: i64,
        previous_interval: Option<i64>,
    ) -> Fallible<Self> {
        let date = Date::parse(date)?;
        let word_mistakes = non_negative("word mistakes", word_mistakes)?;
        let line_mistakes = non_negative("line mistakes", line_mistakes)?;
        let previous_interval = non_negative("interval", previous_interval.unwrap_or(0))?;
        Ok(Self::new(date, word_mistakes, line_mistakes, previous_interval))
    }
}

fn non_negative(field: &str, value: i64) -> Fallible<u32> {
    u32::try_from(value)
        .map_err(|_| ErrorReport::invalid_history(format!("{field} out of range: {value}")))
}
