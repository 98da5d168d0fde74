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

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// Multiplier applied to the interval after a flawless revision.
pub const GROWTH_FACTOR: f64 = 2.0;

/// Multiplier applied to the interval after a revision with minor mistakes.
pub const MILD_SHRINK: f64 = 0.75;

/// The longest interval the scheduler will ever assign, in days.
pub const INTERVAL_CAP: u32 = 730;

/// The largest `interval_cap` a configuration may set: a hundred years.
pub const MAX_INTERVAL_CAP: u32 = 36_500;

/// The shortest interval the scheduler will ever assign, in days.
pub const INTERVAL_FLOOR: u32 = 1;

/// How many word mistakes a single line mistake is worth.
pub const LINE_WEIGHT: u32 = 3;

/// Mistake scores at or below this count as flawless.
pub const MISTAKE_THRESHOLD_LOW: u32 = 0;

/// Mistake scores above this reset the interval to the floor.
pub const MISTAKE_THRESHOLD_HIGH: u32 = 4;

/// The longest history the evaluator accepts for a single page.
pub const MAX_HISTORY: usize = 10_000;

/// The name of the optional configuration file in a collection directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    pub growth_factor: f64,
    pub mild_shrink: f64,
    pub interval_cap: u32,
    pub interval_floor: u32,
    pub line_weight: u32,
    pub mistake_threshold_low: u32,
    pub mistake_threshold_high: u32,
    pub max_history: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            growth_factor: GROWTH_FACTOR,
            mild_shrink: MILD_SHRINK,
            interval_cap: INTERVAL_CAP,
            interval_floor: INTERVAL_FLOOR,
            line_weight: LINE_WEIGHT,
            mistake_threshold_low: MISTAKE_THRESHOLD_LOW,
            mistake_threshold_high: MISTAKE_THRESHOLD_HIGH,
            max_history: MAX_HISTORY,
        }
    }
}

impl SchedulerConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml(s: &str) -> Fallible<Self> {
        let config: SchedulerConfig = toml::from_str(s)?;
        Ok(config)
    }

    /// Load the configuration file from a collection directory, falling back
    /// to the defaults if there is none.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE_NAME);
        if path.exists() {
            log::debug!("Loading configuration from {}", path.display());
            let content = read_to_string(&path)?;
            Self::from_toml(&content)
        } else {
            log::debug!("Using default configuration.");
            Ok(Self::default())
        }
    }

    /// Check the constants are mutually consistent.
    pub fn validate(&self) -> Fallible<()> {
        if !self.growth_factor.is_finite() || self.growth_factor <= 1.0 {
            return Err(ErrorReport::configuration(format!(
                "growth_factor must be greater than 1, got {}",
                self.growth_factor
            )));
        }
        if !self.mild_shrink.is_finite() || self.mild_shrink <= 0.0 || self.mild_shrink > 1.0 {
            return Err(ErrorReport::configuration(format!(
                "mild_shrink must be in (0, 1], got {}",
                self.mild_shrink
            )));
        }
        if self.interval_floor == 0 {
            return Err(ErrorReport::configuration(
                "interval_floor must be at least one day",
            ));
        }
        if self.interval_floor > self.interval_cap {
            return Err(ErrorReport::configuration(format!(
                "interval_floor ({}) exceeds interval_cap ({})",
                self.interval_floor, self.interval_cap
            )));
        }
        if self.interval_cap > MAX_INTERVAL_CAP {
            return Err(ErrorReport::configuration(format!(
                "interval_cap ({}) exceeds the maximum of {MAX_INTERVAL_CAP} days",
                self.interval_cap
            )));
        }
        if self.line_weight <= 1 {
            return Err(ErrorReport::configuration(format!(
                "line_weight must be greater than 1, got {}",
                self.line_weight
            )));
        }
        if self.mistake_threshold_low >= self.mistake_threshold_high {
            return Err(ErrorReport::configuration(format!(
                "mistake_threshold_low ({}) must be below mistake_threshold_high ({})",
                self.mistake_threshold_low, self.mistake_threshold_high
            )));
        }
        if self.max_history == 0 {
            return Err(ErrorReport::configuration("max_history must be positive"));
        }
        Ok(())
    }
}
