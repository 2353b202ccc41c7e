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

//! SM-2 with a two-step learning ladder in front of it.
//!
//! New cards climb the ladder in minutes (1, 5 or 10 minute repeats) and
//! graduate into the review stage after two good grades in a row, or a single
//! easy one. Review cards follow SM-2: 1 day, 6 days, then the previous
//! interval times the easiness factor.

use chrono::DateTime;
use chrono::Days;
use chrono::Duration;
use chrono::Local;
use chrono::TimeZone;
use chrono::Utc;

use crate::types::card::Card;
use crate::types::card::NextReview;
use crate::types::progress::CardProgress;
use crate::types::progress::DEFAULT_PROGRESS;
use crate::types::progress::MAX_INTERVAL_DAYS;
use crate::types::progress::MAX_INTERVAL_MINUTES;
use crate::types::progress::MIN_EASINESS;
use crate::types::progress::Stage;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

/// How long until the next review.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Wait {
    Minutes(u32),
    Days(u32),
}

struct Step {
    stage: Stage,
    repetitions: u32,
    interval: u32,
    learning_step: u8,
    wait: Wait,
}

/// Compute a card's progress after a review graded `quality`.
///
/// The quality is clamped into `0..=5` first, so any number is accepted.
/// The review dates are carried over untouched: stamping them is up to the
/// caller, who knows what day it is.
pub fn compute_next_progress(progress: &CardProgress, quality: f64) -> CardProgress {
    let quality = Quality::clamp(quality);
    let easiness = if progress.easiness.is_finite() {
        progress.easiness
    } else {
        DEFAULT_PROGRESS.easiness
    };
    let step = match progress.stage {
        Stage::Learning => learning(progress, quality),
        Stage::Review => review(progress, quality, easiness),
    };
    let (next_interval_minutes, next_interval_days) = match step.wait {
        Wait::Minutes(minutes) => (Some(minutes), None),
        Wait::Days(days) => (None, Some(days)),
    };
    CardProgress {
        stage: step.stage,
        repetitions: step.repetitions,
        interval: step.interval,
        easiness: next_easiness(easiness, quality),
        learning_step: step.learning_step,
        next_interval_minutes,
        next_interval_days,
        last_reviewed_date: progress.last_reviewed_date,
        last_passed_date: progress.last_passed_date,
    }
}

fn learning(progress: &CardProgress, quality: Quality) -> Step {
    match quality.value() {
        // Blackout: back to the bottom of the ladder.
        0 | 1 => Step {
            stage: Stage::Learning,
            repetitions: 0,
            interval: 0,
            learning_step: 0,
            wait: Wait::Minutes(1),
        },
        2 => Step {
            stage: Stage::Learning,
            repetitions: 0,
            interval: 0,
            learning_step: progress.learning_step,
            wait: Wait::Minutes(5),
        },
        5 => Step {
            stage: Stage::Review,
            repetitions: 2,
            interval: 4,
            learning_step: 0,
            wait: Wait::Days(4),
        },
        _ if progress.learning_step == 0 => Step {
            stage: Stage::Learning,
            repetitions: 0,
            interval: 0,
            learning_step: 1,
            wait: Wait::Minutes(10),
        },
        _ => Step {
            stage: Stage::Review,
            repetitions: 1,
            interval: 1,
            learning_step: 0,
            wait: Wait::Days(1),
        },
    }
}

fn review(progress: &CardProgress, quality: Quality, easiness: f64) -> Step {
    let (repetitions, interval) = if quality.is_lapse() {
        (0, 1)
    } else {
        match progress.repetitions {
            0 => (1, 1),
            1 => (2, 6),
            n => {
                // `as` saturates, so an infinite product lands on the cap.
                let interval = (progress.interval as f64 * easiness).round() as u32;
                (n.saturating_add(1), interval.clamp(1, MAX_INTERVAL_DAYS))
            }
        }
    };
    Step {
        stage: Stage::Review,
        repetitions,
        interval,
        learning_step: 0,
        wait: Wait::Days(interval),
    }
}

fn next_easiness(easiness: f64, quality: Quality) -> f64 {
    let d = (Quality::MAX - quality.value()) as f64;
    let adjusted = easiness + (0.1 - d * (0.08 + d * 0.02));
    let rounded = (adjusted * 100.0).round() / 100.0;
    let rounded = if rounded.is_finite() { rounded } else { adjusted };
    rounded.max(MIN_EASINESS)
}

/// When a card with this progress should next be shown, counting from `now`.
///
/// Whole days are added on the local calendar, so a review scheduled for
/// "6 days from now" keeps its wall-clock time across month ends and
/// daylight saving changes.
pub fn next_review_instant(progress: &CardProgress, now: Timestamp) -> Timestamp {
    let local = now.into_inner().with_timezone(&Local);
    let next = advance(progress, local);
    Timestamp::new(next.with_timezone(&Utc))
}

fn advance<Tz: TimeZone>(progress: &CardProgress, now: DateTime<Tz>) -> DateTime<Tz> {
    let latest = || DateTime::<Utc>::MAX_UTC.with_timezone(&now.timezone());
    if let Some(minutes) = progress.next_interval_minutes.filter(|m| *m > 0) {
        let minutes = minutes.min(MAX_INTERVAL_MINUTES);
        return now
            .clone()
            .checked_add_signed(Duration::minutes(minutes as i64))
            .unwrap_or_else(latest);
    }
    let days = progress
        .next_interval_days
        .unwrap_or(progress.interval)
        .clamp(1, MAX_INTERVAL_DAYS);
    // `checked_add_days` gives up on local times that don't exist or are
    // ambiguous on the target day; fall back to a fixed-length offset, and
    // to the end of time if even that overflows.
    now.clone()
        .checked_add_days(Days::new(days as u64))
        .or_else(|| now.clone().checked_add_signed(Duration::days(days as i64)))
        .unwrap_or_else(latest)
}

/// Grade a card: advance its progress, stamp the review dates, and schedule
/// the next review.
pub fn review_card(card: &mut Card, quality: f64, now: Timestamp) {
    let today = now.local_date();
    let mut progress = compute_next_progress(&card.progress, quality);
    progress.last_reviewed_date = Some(today);
    if Quality::clamp(quality).is_pass() {
        progress.last_passed_date = Some(today);
    }
    let next_review = next_review_instant(&progress, now);
    log::debug!(
        "#{} q={} stage={} reps={} interval={}d EF={:.2} due={}",
        card.number,
        Quality::clamp(quality).value(),
        progress.stage.as_str(),
        progress.repetitions,
        progress.interval,
        progress.easiness,
        next_review.to_rfc3339()
    );
    card.progress = progress;
    card.next_review = NextReview::At(next_review);
}
