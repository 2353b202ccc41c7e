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
use serde::Serializer;

use crate::types::progress::CardProgress;
use crate::types::timestamp::Timestamp;

#[derive(Clone, PartialEq, Debug)]
pub struct Card {
    /// Stable identity, the name's position in the dataset.
    pub number: u32,
    pub name: String,
    pub transliteration: String,
    pub meaning: String,
    pub progress: CardProgress,
    pub next_review: NextReview,
    /// Free text written by the learner.
    pub note: String,
}

/// When a card is next due. Stored values that don't parse are kept as they
/// are, so they survive a save, but such a card is never due.
#[derive(Clone, PartialEq, Debug)]
pub enum NextReview {
    At(Timestamp),
    Unparseable(String),
}

impl Card {
    /// A card that has never been reviewed, due immediately.
    pub fn new(
        number: u32,
        name: String,
        transliteration: String,
        meaning: String,
        now: Timestamp,
    ) -> Self {
        Self {
            number,
            name,
            transliteration,
            meaning,
            progress: CardProgress::default(),
            next_review: NextReview::At(now),
            note: String::new(),
        }
    }

    /// If the card is due at `now`, the instant it became due.
    pub fn due_at(&self, now: Timestamp) -> Option<Timestamp> {
        self.next_review.instant().filter(|due| *due <= now)
    }
}

impl NextReview {
    pub fn parse(s: &str) -> Self {
        match Timestamp::parse(s) {
            Some(ts) => NextReview::At(ts),
            None => NextReview::Unparseable(s.to_string()),
        }
    }

    pub fn instant(&self) -> Option<Timestamp> {
        match self {
            NextReview::At(ts) => Some(*ts),
            NextReview::Unparseable(_) => None,
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            NextReview::At(ts) => ts.to_rfc3339(),
            NextReview::Unparseable(s) => s.clone(),
        }
    }
}

impl Serialize for NextReview {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn card(next_review: NextReview) -> Card {
        Card {
            next_review,
            ..Card::new(
                1,
                "Name".to_string(),
                "Transliteration".to_string(),
                "Meaning".to_string(),
                ts("2026-01-01T00:00:00Z"),
            )
        }
    }

    #[test]
    fn test_new_card_is_due_immediately() {
        let now = ts("2026-01-01T00:00:00Z");
        let card = Card::new(
            3,
            "Name".to_string(),
            "Transliteration".to_string(),
            "Meaning".to_string(),
            now,
        );
        assert_eq!(card.due_at(now), Some(now));
        assert_eq!(card.progress, CardProgress::default());
        assert!(card.note.is_empty());
    }

    #[test]
    fn test_due_at() {
        let card = card(NextReview::parse("2026-01-10T07:00:00Z"));
        assert_eq!(card.due_at(ts("2026-01-10T06:59:59Z")), None);
        assert_eq!(
            card.due_at(ts("2026-01-10T07:00:00Z")),
            Some(ts("2026-01-10T07:00:00Z"))
        );
        assert!(card.due_at(ts("2026-01-11T00:00:00Z")).is_some());
    }

    #[test]
    fn test_unparseable_is_never_due() {
        let card = card(NextReview::parse("soon"));
        assert_eq!(card.next_review, NextReview::Unparseable("soon".to_string()));
        assert_eq!(card.due_at(ts("2100-01-01T00:00:00Z")), None);
    }

    #[test]
    fn test_unparseable_text_is_preserved() {
        assert_eq!(NextReview::parse("soon").to_text(), "soon");
        let json = serde_json::to_string(&NextReview::parse("soon")).unwrap();
        assert_eq!(json, "\"soon\"");
    }
}
