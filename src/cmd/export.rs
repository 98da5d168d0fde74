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

use crate::collection::Collection;
use crate::config::SchedulerConfig;
use crate::db::RevisionRow;
use crate::error::Fallible;
use crate::types::date::Date;
use crate::types::page::Page;
use crate::types::summary::PageSummary;

pub fn export_collection(directory: Option<String>, today: Date) -> Fallible<()> {
    let coll: Collection = Collection::new(directory)?;
    let export: Export = get_export(&coll, today)?;
    let json: String = serde_json::to_string_pretty(&export)?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Export {
    today: Date,
    config: SchedulerConfig,
    pages: Vec<PageExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageExport {
    page: Page,
    summary: PageSummary,
    revisions: Vec<RevisionRow>,
}

fn get_export(coll: &Collection, today: Date) -> Fallible<Export> {
    let summaries = coll.summaries(today)?;
    let mut rows = coll.db.all_revisions()?.into_iter().peekable();
    let mut pages = Vec::with_capacity(summaries.len());
    // Both are ordered by page.
    for (page, summary) in summaries {
        let mut revisions = Vec::new();
        while let Some(row) = rows.next_if(|row| row.page == page) {
            revisions.push(row);
        }
        pages.push(PageExport {
            page,
            summary,
            revisions,
        });
    }
    Ok(Export {
        today,
        config: coll.scheduler.config().clone(),
        pages,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::types::date::date;
    use crate::types::revision::Revision;

    #[test]
    fn test_export() -> Fallible<()> {
        let dir = tempdir()?;
        let mut coll = Collection::new(Some(dir.path().display().to_string()))?;
        let r = Revision::new(date(2024, 1, 1), 0, 0, 0);
        coll.db.add_revision(Page::new(20)?, &r)?;
        coll.db.add_revision(Page::new(3)?, &r)?;
        coll.db.add_revision(Page::new(20)?, &r)?;
        let export = get_export(&coll, date(2024, 1, 2))?;
        assert_eq!(export.pages.len(), 2);
        assert_eq!(export.pages[0].page, Page::new(3)?);
        assert_eq!(export.pages[0].revisions.len(), 1);
        assert_eq!(export.pages[1].revisions.len(), 2);
        assert_eq!(export.pages[1].summary.revision_number, 2);
        let json = serde_json::to_value(&export)?;
        assert_eq!(json["config"]["interval_cap"], 730);
        Ok(())
    }
}
