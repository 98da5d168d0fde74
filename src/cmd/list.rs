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

use crate::aggregate::due_subset;
use crate::aggregate::next_due;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::report::Format;
use crate::report::render_listing;
use crate::types::date::Date;
use crate::view::View;

/// Print every revised page, or only the due ones.
pub fn list_pages(
    directory: Option<String>,
    view: View,
    format: Format,
    today: Date,
) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let output = listing(&coll, view, format, today)?;
    print!("{output}");
    Ok(())
}

pub fn listing(coll: &Collection, view: View, format: Format, today: Date) -> Fallible<String> {
    let summaries = coll.summaries(today)?;
    let next = next_due(&summaries).copied();
    let shown = match view {
        View::Due => due_subset(&summaries),
        View::All | View::Entry => summaries,
    };
    render_listing(format, view, today, &shown, next)
}
