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
use std::fmt::Display;

use crate::error::Fallible;
use crate::evaluate::evaluate;
use crate::scheduler::Scheduler;
use crate::types::date::Date;
use crate::types::revision::Revision;
use crate::types::summary::PageSummary;

/// Group revision rows by page, keeping the input order within each page.
pub fn group_revisions<K, I>(rows: I) -> BTreeMap<K, Vec<Revision>>
where
    K: Ord,
    I: IntoIterator<Item = (K, Revision)>,
{
    let mut grouped: BTreeMap<K, Vec<Revision>> = BTreeMap::new();
    for (key, revision) in rows {
        grouped.entry(key).or_default().push(revision);
    }
    grouped
}

/// Evaluate every page. The first page that fails to evaluate aborts the
/// whole aggregation, with the page identified in the error.
pub fn aggregate<K>(
    scheduler: &Scheduler,
    grouped: &BTreeMap<K, Vec<Revision>>,
    today: Date,
) -> Fallible<BTreeMap<K, PageSummary>>
where
    K: Ord + Clone + Display,
{
    let mut summaries = BTreeMap::new();
    for (key, history) in grouped {
        let summary =
            evaluate(scheduler, history, today).map_err(|e| e.context(format!("page {key}")))?;
        summaries.insert(key.clone(), summary);
    }
    Ok(summaries)
}

/// The summaries of the pages that are due.
pub fn due_subset<K>(summaries: &BTreeMap<K, PageSummary>) -> BTreeMap<K, PageSummary>
where
    K: Ord + Clone,
{
    summaries
        .iter()
        .filter(|(_, summary)| summary.is_due)
        .map(|(key, summary)| (key.clone(), summary.clone()))
        .collect()
}

/// The lowest-numbered due page, i.e. the next one to revise.
pub fn next_due<K>(summaries: &BTreeMap<K, PageSummary>) -> Option<&K>
where
    K: Ord,
{
    summaries
        .iter()
        .find(|(_, summary)| summary.is_due)
        .map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulerConfig;
    use crate::error::ErrorKind;
    use crate::types::date::date;

    fn scheduler() -> Scheduler {
        Scheduler::new(SchedulerConfig::default()).unwrap()
    }

    fn sample() -> BTreeMap<u16, Vec<Revision>> {
        group_revisions([
            (3, Revision::new(date(2024, 1, 1), 0, 0, 0)),
            (1, Revision::new(date(2024, 1, 1), 0, 0, 30)),
            (2, Revision::new(date(2024, 1, 1), 0, 0, 0)),
            (3, Revision::new(date(2024, 1, 2), 0, 0, 1)),
            (10, Revision::new(date(2024, 1, 3), 0, 4, 64)),
        ])
    }

    #[test]
    fn test_group_keeps_order() {
        let grouped = sample();
        assert_eq!(grouped.len(), 4);
        let page3 = &grouped[&3];
        assert_eq!(page3.len(), 2);
        assert_eq!(page3[0].date, date(2024, 1, 1));
        assert_eq!(page3[1].date, date(2024, 1, 2));
    }

    #[test]
    fn test_aggregate_completeness() -> Fallible<()> {
        let grouped = sample();
        let summaries = aggregate(&scheduler(), &grouped, date(2024, 1, 4))?;
        assert_eq!(summaries.len(), grouped.len());
        for key in grouped.keys() {
            assert!(summaries.contains_key(key));
        }
        Ok(())
    }

    #[test]
    fn test_aggregate_matches_evaluate() -> Fallible<()> {
        let s = scheduler();
        let grouped = sample();
        let today = date(2024, 1, 4);
        let summaries = aggregate(&s, &grouped, today)?;
        for (key, history) in &grouped {
            assert_eq!(summaries[key], evaluate(&s, history, today)?);
        }
        Ok(())
    }

    #[test]
    fn test_due_subset_partitions() -> Fallible<()> {
        let summaries = aggregate(&scheduler(), &sample(), date(2024, 1, 4))?;
        let due = due_subset(&summaries);
        // Page 1 is due on Mar 1, page 2 on Jan 2, page 3 on Jan 4. Page 10
        // was reset and is due on Jan 4.
        assert_eq!(due.keys().copied().collect::<Vec<_>>(), vec![2, 3, 10]);
        assert!(due.values().all(|summary| summary.is_due));
        for (key, summary) in &summaries {
            if !due.contains_key(key) {
                assert!(!summary.is_due);
            }
        }
        Ok(())
    }

    #[test]
    fn test_next_due() -> Fallible<()> {
        let summaries = aggregate(&scheduler(), &sample(), date(2024, 1, 4))?;
        assert_eq!(next_due(&summaries), Some(&2));
        let summaries = aggregate(&scheduler(), &sample(), date(2023, 12, 1))?;
        assert_eq!(next_due(&summaries), None);
        Ok(())
    }

    #[test]
    fn test_failure_names_page() {
        let mut grouped = sample();
        grouped.insert(7, Vec::new());
        let err = aggregate(&scheduler(), &grouped, date(2024, 1, 4)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHistory);
        assert!(err.to_string().contains("page 7"));
    }

    #[test]
    fn test_empty_input() -> Fallible<()> {
        let grouped: BTreeMap<u16, Vec<Revision>> = BTreeMap::new();
        let summaries = aggregate(&scheduler(), &grouped, date(2024, 1, 4))?;
        assert!(summaries.is_empty());
        assert!(due_subset(&summaries).is_empty());
        Ok(())
    }
}
