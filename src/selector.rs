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

use crate::types::card::Card;
use crate::types::date::Date;
use crate::types::timestamp::Timestamp;

/// Due cards are drawn from the first non-empty tier, in this order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Tier {
    /// Learning-ladder repeats that are waiting on minutes, not days.
    QuickRepeat,
    /// Already seen today.
    ReviewedToday,
    /// Everything else that is due.
    New,
}

/// Which tier a card belongs to at `now`, and when it became due. `None` if
/// the card is not due.
pub fn classify(card: &Card, now: Timestamp, today: Date) -> Option<(Tier, Timestamp)> {
    let due = card.due_at(now)?;
    let tier = if card.progress.is_quick_repeat() {
        Tier::QuickRepeat
    } else if card.progress.reviewed_on() == Some(today) {
        Tier::ReviewedToday
    } else {
        Tier::New
    };
    Some((tier, due))
}

/// Pick the index of the card to show next: the earliest-due card of the
/// highest-priority tier. On equal due times the first card wins.
pub fn pick_next_card(cards: &[Card], now: Timestamp) -> Option<usize> {
    let today = now.local_date();
    cards
        .iter()
        .enumerate()
        .filter_map(|(index, card)| {
            classify(card, now, today).map(|(tier, due)| (tier, due, index))
        })
        .min()
        .map(|(_, _, index)| index)
}

/// The counts shown above the card.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSummary {
    /// Due and not yet seen today.
    pub new_count: usize,
    /// Due and already seen today.
    pub reviewing_count: usize,
    /// Scheduled for some time tomorrow.
    pub due_tomorrow_count: usize,
    /// The soonest review that isn't due yet.
    pub next_upcoming: Option<Timestamp>,
}

pub fn summarize(cards: &[Card], now: Timestamp) -> QueueSummary {
    let today = now.local_date();
    let tomorrow = today.succ();
    let window = tomorrow.and_then(|tomorrow| Some((tomorrow.start()?, tomorrow.succ()?.start()?)));
    let mut summary = QueueSummary {
        new_count: 0,
        reviewing_count: 0,
        due_tomorrow_count: 0,
        next_upcoming: None,
    };
    for card in cards {
        let Some(next_review) = card.next_review.instant() else {
            continue;
        };
        if next_review <= now {
            if card.progress.reviewed_on() == Some(today) {
                summary.reviewing_count += 1;
            } else {
                summary.new_count += 1;
            }
        } else if summary.next_upcoming.is_none_or(|upcoming| next_review < upcoming) {
            summary.next_upcoming = Some(next_review);
        }
        if let Some((start, end)) = window {
            if start <= next_review && next_review < end {
                summary.due_tomorrow_count += 1;
            }
        }
    }
    summary
}
