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

use std::collections::BTreeMap;
use std::env::current_dir;
use std::path::PathBuf;
use std::time::Instant;

use crate::aggregate::aggregate;
use crate::aggregate::group_revisions;
use crate::config::SchedulerConfig;
use crate::db::Database;
use crate::db::RevisionRow;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::evaluate::evaluate;
use crate::scheduler::Scheduler;
use crate::types::date::Date;
use crate::types::page::Page;
use crate::types::revision::Revision;
use crate::types::summary::PageSummary;

/// The name of the database file in a collection directory.
pub const DB_FILE_NAME: &str = "quran-srs.db";

/// A directory holding a revision database and, optionally, a scheduler
/// configuration.
pub struct Collection {
    pub directory: PathBuf,
    pub db: Database,
    pub scheduler: Scheduler,
}

impl Collection {
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let config = SchedulerConfig::load(&directory)?;
        let scheduler = Scheduler::new(config)?;

        let db_path: PathBuf = directory.join(DB_FILE_NAME);
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let db: Database = Database::new(db_path)?;

        Ok(Self {
            directory,
            db,
            scheduler,
        })
    }

    /// Summaries for every page that has been revised at least once.
    pub fn summaries(&self, today: Date) -> Fallible<BTreeMap<Page, PageSummary>> {
        log::debug!("Loading revisions...");
        let start = Instant::now();
        let rows: Vec<RevisionRow> = self.db.all_revisions()?;
        let count = rows.len();
        let grouped = group_revisions(rows.into_iter().map(|row| (row.page, row.revision)));
        let summaries = aggregate(&self.scheduler, &grouped, today)?;
        let duration = start.elapsed().as_millis();
        log::debug!(
            "Evaluated {} pages from {count} revisions in {duration}ms.",
            summaries.len()
        );
        Ok(summaries)
    }

    /// The history and summary of a single page. The summary is `None` if the
    /// page has never been revised.
    pub fn page(
        &self,
        page: Page,
        today: Date,
    ) -> Fallible<(Vec<RevisionRow>, Option<PageSummary>)> {
        let rows = self.db.page_revisions(page)?;
        if rows.is_empty() {
            return Ok((rows, None));
        }
        let history: Vec<Revision> = rows.iter().map(|row| row.revision).collect();
        let summary = evaluate(&self.scheduler, &history, today)
            .map_err(|e| e.context(format!("page {page}")))?;
        Ok((rows, Some(summary)))
    }
}
