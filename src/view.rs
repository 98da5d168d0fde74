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

use crate::types::summary::PageSummary;

/// A column that can be shown for a page summary.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DisplayKey {
    RevisionNumber,
    Mistakes,
    PageStrength,
    LastRevisionDate,
    ScheduledInterval,
    ScheduledDueDate,
    DaysDue,
}

const ALL_KEYS: [DisplayKey; 7] = [
    DisplayKey::ScheduledInterval,
    DisplayKey::RevisionNumber,
    DisplayKey::Mistakes,
    DisplayKey::PageStrength,
    DisplayKey::LastRevisionDate,
    DisplayKey::DaysDue,
    DisplayKey::ScheduledDueDate,
];

impl DisplayKey {
    pub fn label(self) -> &'static str {
        match self {
            DisplayKey::RevisionNumber => "Revisions",
            DisplayKey::Mistakes => "Mistakes",
            DisplayKey::PageStrength => "Page Strength",
            DisplayKey::LastRevisionDate => "Last Touch",
            DisplayKey::ScheduledInterval => "Interval",
            DisplayKey::ScheduledDueDate => "Due On",
            DisplayKey::DaysDue => "Days Due",
        }
    }

    pub fn value(self, summary: &PageSummary) -> String {
        match self {
            DisplayKey::RevisionNumber => summary.revision_number.to_string(),
            DisplayKey::Mistakes => summary.mistakes.to_string(),
            DisplayKey::PageStrength => format!("{:.1}", summary.page_strength),
            DisplayKey::LastRevisionDate => summary.last_revision_date.to_string(),
            DisplayKey::ScheduledInterval => summary.scheduled_interval.to_string(),
            DisplayKey::ScheduledDueDate => summary.scheduled_due_date.to_string(),
            DisplayKey::DaysDue => summary.days_due.to_string(),
        }
    }
}

/// Which page listing is being shown.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum View {
    /// Every revised page.
    All,
    /// Only the pages that are due.
    Due,
    /// A single page, while recording a revision.
    Entry,
}

impl View {
    pub fn keys(self) -> Vec<DisplayKey> {
        let excluded: &[DisplayKey] = match self {
            View::All => &[DisplayKey::DaysDue],
            View::Due => &[DisplayKey::ScheduledInterval],
            View::Entry => &[
                DisplayKey::ScheduledDueDate,
                DisplayKey::PageStrength,
                DisplayKey::DaysDue,
            ],
        };
        ALL_KEYS
            .into_iter()
            .filter(|key| !excluded.contains(key))
            .collect()
    }

    pub fn title(self) -> &'static str {
        match self {
            View::All => "All Pages",
            View::Due => "Due Pages",
            View::Entry => "Page",
        }
    }
}

impl Display for View {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            View::All => write!(f, "all"),
            View::Due => write!(f, "due"),
            View::Entry => write!(f, "entry"),
        }
    }
}
