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

use crate::aggregate::next_due;
use crate::collection::Collection;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::evaluate::next_revision;
use crate::types::date::Date;
use crate::types::page::Page;

pub struct RecordArgs {
    pub page: Page,
    pub word_mistakes: u32,
    pub line_mistakes: u32,
    pub date: Date,
    pub today: Date,
}

pub fn record_revision(directory: Option<String>, args: RecordArgs) -> Fallible<()> {
    let mut coll = Collection::new(directory)?;
    let (_, current) = coll.page(args.page, args.today)?;
    if let Some(summary) = &current {
        // Intervals chain from the latest revision, so a record may not predate it.
        if args.date < summary.last_revision_date {
            return Err(ErrorReport::invalid_history(format!(
                "page {} was last revised on {}, cannot record a revision on {}",
                args.page, summary.last_revision_date, args.date
            )));
        }
    }
    let is_new = current.is_none();
    let revision = next_revision(
        current.as_ref(),
        args.date,
        args.word_mistakes,
        args.line_mistakes,
    );
    let revision_id = coll.db.add_revision(args.page, &revision)?;
    log::debug!("Recorded revision {revision_id} of page {}", args.page);

    if let (_, Some(summary)) = coll.page(args.page, args.today)? {
        println!(
            "Page {}: strength {:.1}, next revision in {} days, on {}.",
            args.page, summary.page_strength, summary.scheduled_interval, summary.scheduled_due_date
        );
    }

    if is_new {
        match args.page.next() {
            Some(page) => println!("Next new page: {page}."),
            None => println!("That was the last page."),
        }
    } else {
        let summaries = coll.summaries(args.today)?;
        match next_due(&summaries) {
            Some(page) => println!("Next due page: {page}."),
            None => println!("No more pages due."),
        }
    }
    Ok(())
}
