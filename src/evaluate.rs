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

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::scheduler::Scheduler;
use crate::scheduler::Tier;
use crate::types::date::Date;
use crate::types::revision::Revision;
use crate::types::summary::PageSummary;

/// Summarize a page from its revision history.
///
/// Records are processed by date. Records sharing a date keep their input
/// order, so the last of them in the input is the page's latest revision.
pub fn evaluate(scheduler: &Scheduler, history: &[Revision], today: Date) -> Fallible<PageSummary> {
    if history.is_empty() {
        return Err(ErrorReport::invalid_history("revision history is empty"));
    }
    let max_history = scheduler.config().max_history;
    if history.len() > max_history {
        return Err(ErrorReport::invalid_history(format!(
            "revision history has {} records, more than the limit of {max_history}",
            history.len()
        )));
    }

    let mut ordered: Vec<&Revision> = history.iter().collect();
    // `sort_by_key` is stable.
    ordered.sort_by_key(|revision| revision.date);

    let scores: Vec<u32> = ordered
        .iter()
        .map(|revision| scheduler.mistake_score(revision))
        .collect();
    let total_mistakes: u64 = scores.iter().map(|score| u64::from(*score)).sum();
    let streak = scores
        .iter()
        .rev()
        .take_while(|score| scheduler.tier(**score) == Tier::Flawless)
        .count();

    let latest: &Revision = ordered[ordered.len() - 1];
    let score = scores[scores.len() - 1];
    let scheduled_interval = scheduler.next_interval(latest.previous_interval, score);
    let scheduled_due_date = latest.date.add_days(scheduled_interval)?;
    let days_due = today.days_since(scheduled_due_date);

    Ok(PageSummary {
        revision_number: ordered.len(),
        mistakes: score,
        word_mistakes: latest.word_mistakes,
        line_mistakes: latest.line_mistakes,
        total_mistakes,
        streak,
        page_strength: scheduler.page_strength(scheduled_interval, streak, score),
        last_revision_date: latest.date,
        scheduled_interval,
        scheduled_due_date,
        days_due,
        is_due: days_due >= 0,
    })
}

/// Build the record for a new revision of a page. `current` is the page's
/// summary before this revision, or `None` for a page never revised.
pub fn next_revision(
    current: Option<&PageSummary>,
    date: Date,
    word_mistakes: u32,
    line_mistakes: u32,
) -> Revision {
    let previous_interval = current.map_or(0, |summary| summary.scheduled_interval);
    Revision::new(date, word_mistakes, line_mistakes, previous_interval)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::config::MAX_INTERVAL_CAP;
    use crate::config::SchedulerConfig;
    use crate::error::ErrorKind;
    use crate::types::date::date;

    fn scheduler() -> Scheduler {
        Scheduler::new(SchedulerConfig::default()).unwrap()
    }

    /// Revise a page once a day at its due date, with the given mistakes,
    /// returning the summary after each revision.
    fn simulate(s: &Scheduler, mistakes: &[(u32, u32)]) -> Fallible<Vec<PageSummary>> {
        let mut history = Vec::new();
        let mut summaries: Vec<PageSummary> = Vec::new();
        let mut day = date(2024, 1, 1);
        for (word, line) in mistakes {
            let revision = next_revision(summaries.last(), day, *word, *line);
            history.push(revision);
            let summary = evaluate(s, &history, day)?;
            day = summary.scheduled_due_date;
            summaries.push(summary);
        }
        Ok(summaries)
    }

    #[test]
    fn test_empty_history() {
        let err = evaluate(&scheduler(), &[], date(2024, 1, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHistory);
    }

    #[test]
    fn test_history_too_long() -> Fallible<()> {
        let s = Scheduler::new(SchedulerConfig {
            max_history: 2,
            ..SchedulerConfig::default()
        })?;
        let r = Revision::new(date(2024, 1, 1), 0, 0, 0);
        let err = evaluate(&s, &[r, r, r], date(2024, 1, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHistory);
        Ok(())
    }

    #[test]
    fn test_due_date_arithmetic() -> Fallible<()> {
        // One word mistake shrinks an interval of 7 to 5.
        let history = [Revision::new(date(2024, 1, 1), 1, 0, 7)];
        let summary = evaluate(&scheduler(), &history, date(2024, 1, 10))?;
        assert_eq!(summary.last_revision_date, date(2024, 1, 1));
        assert_eq!(summary.scheduled_interval, 5);
        assert_eq!(summary.scheduled_due_date, date(2024, 1, 6));
        assert_eq!(summary.days_due, 4);
        assert!(summary.is_due);
        Ok(())
    }

    #[test]
    fn test_due_today() -> Fallible<()> {
        let history = [Revision::new(date(2024, 1, 1), 0, 0, 0)];
        let summary = evaluate(&scheduler(), &history, date(2024, 1, 2))?;
        assert_eq!(summary.scheduled_due_date, date(2024, 1, 2));
        assert_eq!(summary.days_due, 0);
        assert!(summary.is_due);
        Ok(())
    }

    #[test]
    fn test_not_due_yet() -> Fallible<()> {
        let history = [Revision::new(date(2024, 1, 1), 0, 0, 10)];
        let summary = evaluate(&scheduler(), &history, date(2024, 1, 5))?;
        assert_eq!(summary.scheduled_due_date, date(2024, 1, 21));
        assert_eq!(summary.days_due, -16);
        assert!(!summary.is_due);
        Ok(())
    }

    #[test]
    fn test_flawless_streak_grows_interval() -> Fallible<()> {
        let s = scheduler();
        let summaries = simulate(&s, &[(0, 0); 14])?;
        let intervals: Vec<u32> = summaries.iter().map(|s| s.scheduled_interval).collect();
        assert_eq!(
            intervals,
            vec![1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 730, 730, 730, 730]
        );
        let uncapped: Vec<u32> = intervals.iter().copied().filter(|i| *i < 730).collect();
        assert!(uncapped.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(summaries[13].streak, 14);
        assert_eq!(summaries[13].revision_number, 14);
        assert_eq!(summaries[13].total_mistakes, 0);
        Ok(())
    }

    #[test]
    fn test_high_mistakes_reset_interval() -> Fallible<()> {
        let s = scheduler();
        let mut mistakes = vec![(0, 0); 9];
        mistakes.push((1, 2));
        let summaries = simulate(&s, &mistakes)?;
        assert_eq!(summaries[8].scheduled_interval, 256);
        let last = &summaries[9];
        assert_eq!(last.mistakes, 7);
        assert_eq!(last.scheduled_interval, s.config().interval_floor);
        assert_eq!(last.streak, 0);
        Ok(())
    }

    #[test]
    fn test_minor_mistakes_shrink_interval() -> Fallible<()> {
        let s = scheduler();
        let summaries = simulate(&s, &[(0, 0), (0, 0), (0, 0), (0, 0), (0, 0), (2, 0)])?;
        assert_eq!(summaries[4].scheduled_interval, 16);
        assert_eq!(summaries[5].scheduled_interval, 12);
        Ok(())
    }

    #[test]
    fn test_strength_monotone_in_latest_mistakes() -> Fallible<()> {
        let s = scheduler();
        let today = date(2024, 6, 1);
        let mut last = f64::MAX;
        for (word, line) in [(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (5, 5)] {
            let history = [
                Revision::new(date(2024, 1, 1), 0, 0, 0),
                Revision::new(date(2024, 1, 2), 0, 0, 1),
                Revision::new(date(2024, 1, 4), word, line, 2),
            ];
            let summary = evaluate(&s, &history, today)?;
            assert!(summary.page_strength <= last, "word={word} line={line}");
            last = summary.page_strength;
        }
        Ok(())
    }

    #[test]
    fn test_strength_monotone_in_interval() -> Fallible<()> {
        let s = scheduler();
        let mut last = -1.0;
        for previous in [0, 1, 5, 20, 100, 400] {
            let history = [Revision::new(date(2024, 1, 1), 1, 0, previous)];
            let summary = evaluate(&s, &history, date(2024, 1, 1))?;
            assert!(summary.page_strength >= last);
            last = summary.page_strength;
        }
        Ok(())
    }

    #[test]
    fn test_idempotent() -> Fallible<()> {
        let s = scheduler();
        let history = [
            Revision::new(date(2024, 1, 1), 0, 1, 0),
            Revision::new(date(2024, 1, 2), 0, 0, 1),
        ];
        let a = evaluate(&s, &history, date(2024, 2, 1))?;
        let b = evaluate(&s, &history, date(2024, 2, 1))?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_unsorted_input() -> Fallible<()> {
        let s = scheduler();
        let sorted = [
            Revision::new(date(2024, 1, 1), 3, 0, 0),
            Revision::new(date(2024, 1, 5), 0, 0, 4),
        ];
        let unsorted = [sorted[1], sorted[0]];
        let a = evaluate(&s, &sorted, date(2024, 2, 1))?;
        let b = evaluate(&s, &unsorted, date(2024, 2, 1))?;
        assert_eq!(a, b);
        assert_eq!(a.last_revision_date, date(2024, 1, 5));
        assert_eq!(a.scheduled_interval, 8);
        Ok(())
    }

    #[test]
    fn test_same_day_last_input_wins() -> Fallible<()> {
        let s = scheduler();
        let clean = Revision::new(date(2024, 1, 5), 0, 0, 4);
        let sloppy = Revision::new(date(2024, 1, 5), 0, 3, 4);
        let summary = evaluate(&s, &[clean, sloppy], date(2024, 1, 5))?;
        assert_eq!(summary.mistakes, 9);
        assert_eq!(summary.scheduled_interval, 1);
        let summary = evaluate(&s, &[sloppy, clean], date(2024, 1, 5))?;
        assert_eq!(summary.mistakes, 0);
        assert_eq!(summary.scheduled_interval, 8);
        Ok(())
    }

    #[test]
    fn test_raw_and_total_mistakes() -> Fallible<()> {
        let s = scheduler();
        let history = [
            Revision::new(date(2024, 1, 1), 2, 1, 0),
            Revision::new(date(2024, 1, 2), 1, 0, 1),
        ];
        let summary = evaluate(&s, &history, date(2024, 1, 2))?;
        assert_eq!(summary.word_mistakes, 1);
        assert_eq!(summary.line_mistakes, 0);
        assert_eq!(summary.mistakes, 1);
        assert_eq!(summary.total_mistakes, 5 + 1);
        Ok(())
    }

    #[test]
    fn test_due_date_past_calendar_end() {
        let last_day = Date::new(NaiveDate::MAX);
        let history = [Revision::new(last_day, 0, 0, 0)];
        let err = evaluate(&scheduler(), &history, date(2024, 1, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHistory);
    }

    #[test]
    fn test_longest_cap_stays_in_range() -> Fallible<()> {
        let s = Scheduler::new(SchedulerConfig {
            interval_cap: MAX_INTERVAL_CAP,
            ..SchedulerConfig::default()
        })?;
        let history = [Revision::new(date(2024, 1, 1), 0, 0, u32::MAX)];
        let summary = evaluate(&s, &history, date(2024, 1, 1))?;
        assert_eq!(summary.scheduled_interval, MAX_INTERVAL_CAP);
        let due = date(2024, 1, 1).add_days(MAX_INTERVAL_CAP)?;
        assert_eq!(summary.scheduled_due_date, due);
        Ok(())
    }

    #[test]
    fn test_next_revision_carries_interval() -> Fallible<()> {
        let s = scheduler();
        let first = next_revision(None, date(2024, 1, 1), 0, 0);
        assert_eq!(first.previous_interval, 0);
        let summary = evaluate(&s, &[first], date(2024, 1, 1))?;
        let second = next_revision(Some(&summary), date(2024, 1, 2), 1, 0);
        assert_eq!(second.previous_interval, summary.scheduled_interval);
        Ok(())
    }
}
