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

use rusqlite::Connection;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::page::Page;
use crate::types::revision::Revision;

pub type RevisionId = i64;

pub struct Database {
    conn: Connection,
}

/// A stored revision together with its row identity.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionRow {
    pub revision_id: RevisionId,
    pub page: Page,
    #[serde(flatten)]
    pub revision: Revision,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    /// Record a revision of a page.
    pub fn add_revision(&mut self, page: Page, revision: &Revision) -> Fallible<RevisionId> {
        log::debug!("Adding revision of page {page} on {}", revision.date);
        let tx = self.conn.transaction()?;
        let sql = "insert into revisions (page, revision_date, word_mistakes, line_mistakes, previous_interval) values (?, ?, ?, ?, ?) returning revision_id;";
        let revision_id: RevisionId = tx.query_row(
            sql,
            (
                page,
                revision.date,
                revision.word_mistakes,
                revision.line_mistakes,
                revision.previous_interval,
            ),
            |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(revision_id)
    }

    /// The revisions of a page, oldest first. Revisions on the same day are
    /// in the order they were recorded.
    pub fn page_revisions(&self, page: Page) -> Fallible<Vec<RevisionRow>> {
        let sql = "select revision_id, page, revision_date, word_mistakes, line_mistakes, previous_interval from revisions where page = ? order by revision_date, revision_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([page])?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            result.push(read_row(row)?);
        }
        Ok(result)
    }

    /// Every revision, ordered by page, then date, then recording order.
    pub fn all_revisions(&self) -> Fallible<Vec<RevisionRow>> {
        let sql = "select revision_id, page, revision_date, word_mistakes, line_mistakes, previous_interval from revisions order by page, revision_date, revision_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            result.push(read_row(row)?);
        }
        Ok(result)
    }

    /// Delete a revision. Returns an error if it does not exist.
    pub fn delete_revision(&mut self, revision_id: RevisionId) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute(
            "delete from revisions where revision_id = ?;",
            [revision_id],
        )?;
        if deleted == 0 {
            return Err(ErrorReport::new(format!(
                "no revision with id {revision_id}."
            )));
        }
        tx.commit()?;
        Ok(())
    }
}

/// Rows are read loosely typed and validated on the way in, so a corrupt row
/// surfaces as an invalid history rather than a database error.
fn read_row(row: &Row) -> Fallible<RevisionRow> {
    let revision_id: RevisionId = row.get(0)?;
    let page: Page = row.get(1)?;
    let date: String = row.get(2)?;
    let word_mistakes: i64 = row.get(3)?;
    let line_mistakes: i64 = row.get(4)?;
    let previous_interval: Option<i64> = row.get(5)?;
    let revision = Revision::from_raw(&date, word_mistakes, line_mistakes, previous_interval)
        .map_err(|e| e.context(format!("revision {revision_id}")))?;
    Ok(RevisionRow {
        revision_id,
        page,
        revision,
    })
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["revisions"], |row| row.get(0))?;
    Ok(count > 0)
}
