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

use crate::types::date::Date;

/// Everything the evaluator knows about a page.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    /// The number of revisions in the page's history.
    pub revision_number: usize,
    /// The mistake score of the latest revision.
    pub mistakes: u32,
    /// The latest revision's raw word mistake count.
    pub word_mistakes: u32,
    /// The latest revision's raw line mistake count.
    pub line_mistakes: u32,
    /// The sum of the mistake scores of every revision.
    pub total_mistakes: u64,
    /// How many of the most recent revisions were flawless, in a row.
    pub streak: usize,
    /// Retention score from 0 to 100.
    pub page_strength: f64,
    pub last_revision_date: Date,
    /// The interval until the next revision, in days.
    pub scheduled_interval: u32,
    pub scheduled_due_date: Date,
    /// Days since the due date. Negative if the page is not due yet.
    pub days_due: i64,
    pub is_due: bool,
}
