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

use crate::config::SchedulerConfig;
use crate::error::Fallible;
use crate::types::revision::Revision;

/// Flawless revisions needed for the full streak bonus.
const STREAK_TARGET: usize = 5;

/// Share of page strength contributed by the interval.
const INTERVAL_WEIGHT: f64 = 0.6;

/// Share of page strength contributed by the flawless streak.
const STREAK_WEIGHT: f64 = 0.4;

/// Largest deduction the latest revision's mistakes can cause.
const PENALTY_WEIGHT: f64 = 0.5;

/// How a revision went, as far as the interval is concerned.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tier {
    /// At or below the low threshold: the interval grows.
    Flawless,
    /// Between the thresholds: the interval shrinks mildly.
    Minor,
    /// Above the high threshold: the interval resets to the floor.
    Significant,
}

/// The interval policy, built from a validated configuration.
#[derive(Clone, Debug)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Fallible<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn mistake_score(&self, revision: &Revision) -> u32 {
        revision
            .word_mistakes
            .saturating_add(revision.line_mistakes.saturating_mul(self.config.line_weight))
    }

    pub fn tier(&self, score: u32) -> Tier {
        if score <= self.config.mistake_threshold_low {
            Tier::Flawless
        } else if score <= self.config.mistake_threshold_high {
            Tier::Minor
        } else {
            Tier::Significant
        }
    }

    /// The interval to schedule after a revision with the given score, which
    /// was recorded while `previous` was in effect.
    pub fn next_interval(&self, previous: u32, score: u32) -> u32 {
        let floor = self.config.interval_floor;
        let cap = self.config.interval_cap;
        match self.tier(score) {
            Tier::Flawless => {
                let grown = (f64::from(previous) * self.config.growth_factor).ceil();
                let grown = clamp_days(grown).max(previous.saturating_add(1));
                grown.clamp(floor, cap)
            }
            Tier::Minor => {
                let shrunk = (f64::from(previous) * self.config.mild_shrink).round();
                clamp_days(shrunk).clamp(floor, cap)
            }
            Tier::Significant => floor,
        }
    }

    /// Retention score from 0 to 100.
    ///
    /// Never decreases as `interval` or `streak` grow, and never increases as
    /// `score` grows.
    pub fn page_strength(&self, interval: u32, streak: usize, score: u32) -> f64 {
        let cap = f64::from(self.config.interval_cap);
        let interval = f64::from(interval).min(cap);
        let interval_term = (1.0 + interval).ln() / (1.0 + cap).ln();
        let streak_term = streak.min(STREAK_TARGET) as f64 / STREAK_TARGET as f64;
        let penalty =
            (f64::from(score) / (f64::from(self.config.mistake_threshold_high) + 1.0)).min(1.0);
        let raw = INTERVAL_WEIGHT * interval_term + STREAK_WEIGHT * streak_term
            - PENALTY_WEIGHT * penalty;
        (raw.clamp(0.0, 1.0) * 1000.0).round() / 10.0
    }
}

fn clamp_days(days: f64) -> u32 {
    if days >= f64::from(u32::MAX) {
        u32::MAX
    } else if days <= 0.0 {
        0
    } else {
        days as u32
    }
}
