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

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::lenient::is_truthy;
use crate::lenient::lenient_number;
use crate::lenient::lenient_string;
use crate::types::date::Date;

/// The lowest the easiness factor can go.
pub const MIN_EASINESS: f64 = 1.3;

/// The longest wait ever scheduled, about a century.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

pub const MAX_INTERVAL_MINUTES: u32 = MAX_INTERVAL_DAYS * 24 * 60;

/// Progress of a card that has never been reviewed.
pub const DEFAULT_PROGRESS: CardProgress = CardProgress {
    stage: Stage::Learning,
    repetitions: 0,
    interval: 0,
    easiness: 2.5,
    learning_step: 0,
    next_interval_minutes: None,
    next_interval_days: None,
    last_reviewed_date: None,
    last_passed_date: None,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Inside the two-step learning ladder, repeated within minutes.
    Learning,
    /// Graduated; repeated after whole days.
    Review,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Learning => "learning",
            Stage::Review => "review",
        }
    }
}

/// The scheduling state attached to each card.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardProgress {
    pub stage: Stage,
    /// Consecutive successful recalls since the last lapse.
    pub repetitions: u32,
    /// The last computed interval, in days.
    pub interval: u32,
    pub easiness: f64,
    /// Position in the learning ladder: 0 or 1.
    pub learning_step: u8,
    /// If set, the next review is this many minutes away.
    pub next_interval_minutes: Option<u32>,
    /// If set, the next review is this many days away.
    pub next_interval_days: Option<u32>,
    /// The day of the most recent review, whatever the grade.
    pub last_reviewed_date: Option<Date>,
    /// The day of the most recent passing review.
    pub last_passed_date: Option<Date>,
}

impl Default for CardProgress {
    fn default() -> Self {
        DEFAULT_PROGRESS
    }
}

impl CardProgress {
    /// The day this card was last looked at, if any.
    pub fn reviewed_on(&self) -> Option<Date> {
        self.last_reviewed_date.or(self.last_passed_date)
    }

    /// Whether the card is waiting on a sub-day repeat.
    pub fn is_quick_repeat(&self) -> bool {
        self.next_interval_minutes.is_some_and(|minutes| minutes > 0)
    }
}

/// Progress as it comes off disk: every field may be missing or hold the
/// wrong kind of value. Turned into a `CardProgress` by `normalize`.
#[derive(Clone, Default, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// Kept raw: any non-empty value counts as a stage, even a malformed one.
    #[serde(default)]
    pub stage: Option<Value>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub repetitions: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub interval: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub easiness: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub learning_step: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub next_interval_minutes: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub next_interval_days: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_reviewed_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_passed_date: Option<String>,
}

impl ProgressRecord {
    /// Fill in every missing or malformed field from `DEFAULT_PROGRESS`.
    pub fn normalize(&self) -> CardProgress {
        let repetitions = count(self.repetitions).unwrap_or(DEFAULT_PROGRESS.repetitions);
        let interval = days(self.interval).unwrap_or(DEFAULT_PROGRESS.interval);
        let stage = match self.stage.as_ref().filter(|stage| is_truthy(stage)) {
            Some(Value::String(s)) if s == "review" => Stage::Review,
            Some(_) => Stage::Learning,
            // Records written before stages existed: anything with review
            // history is already past the learning ladder.
            None => {
                if repetitions > 0 || interval > 0 {
                    Stage::Review
                } else {
                    Stage::Learning
                }
            }
        };
        let easiness = finite(self.easiness).unwrap_or(DEFAULT_PROGRESS.easiness);
        // A negative step still counts as past the first rung.
        let learning_step = match finite(self.learning_step) {
            Some(step) if step != 0.0 => 1,
            _ => 0,
        };
        // Any positive wait is a quick repeat, however short.
        let next_interval_minutes = finite(self.next_interval_minutes)
            .filter(|minutes| *minutes > 0.0)
            .map(|minutes| minutes.round().clamp(1.0, MAX_INTERVAL_MINUTES as f64) as u32);
        let next_interval_days = days(self.next_interval_days);
        let last_passed_date = self.last_passed_date.as_deref().and_then(Date::parse);
        let last_reviewed_date = self
            .last_reviewed_date
            .as_deref()
            .and_then(Date::parse)
            .or(last_passed_date);
        CardProgress {
            stage,
            repetitions,
            interval,
            easiness,
            learning_step,
            next_interval_minutes,
            next_interval_days,
            last_reviewed_date,
            last_passed_date,
        }
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// A non-negative whole number.
fn count(value: Option<f64>) -> Option<u32> {
    finite(value).map(|v| v.max(0.0).round() as u32)
}

fn days(value: Option<f64>) -> Option<u32> {
    count(value).map(|days| days.min(MAX_INTERVAL_DAYS))
}
