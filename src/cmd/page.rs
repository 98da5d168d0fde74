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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::report::Format;
use crate::report::render_page;
use crate::types::date::Date;
use crate::types::page::Page;

/// Print a page's summary and revision history.
pub fn show_page(
    directory: Option<String>,
    page: Page,
    format: Format,
    today: Date,
) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let (rows, summary) = coll.page(page, today)?;
    let output = render_page(format, page, &rows, summary.as_ref())?;
    print!("{output}");
    Ok(())
}
