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

use crate::error::Fallible;
use crate::error::fail;
use crate::scheduler::review_card;
use crate::selector::QueueSummary;
use crate::selector::pick_next_card;
use crate::selector::summarize;
use crate::store::CardStore;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

/// A drilling session: the in-memory collection, the store it is written
/// back to after every change, and the card currently on screen.
pub struct Session<S: CardStore> {
    store: S,
    cards: Vec<Card>,
    current: Option<usize>,
    reviewed: usize,
}

impl<S: CardStore> Session<S> {
    pub fn new(store: S, cards: Vec<Card>, now: Timestamp) -> Self {
        let current = pick_next_card(&cards, now);
        Self {
            store,
            cards,
            current,
            reviewed: 0,
        }
    }

    /// Start a session over whatever the store holds.
    pub fn load(store: S, now: Timestamp) -> Fallible<Self> {
        let cards = store.load_cards()?;
        Ok(Self::new(store, cards, now))
    }

    /// The card to show, or `None` when nothing is due.
    pub fn current(&self) -> Option<&Card> {
        self.current.map(|index| &self.cards[index])
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// How many cards were graded in this session.
    pub fn reviewed(&self) -> usize {
        self.reviewed
    }

    pub fn summary(&self, now: Timestamp) -> QueueSummary {
        summarize(&self.cards, now)
    }

    /// Grade the current card, save the collection, and move on to the next
    /// card.
    pub fn grade(&mut self, quality: f64, now: Timestamp) -> Fallible<()> {
        let Some(index) = self.current else {
            return fail("no card to grade.");
        };
        review_card(&mut self.cards[index], quality, now);
        self.store.save_cards(&self.cards)?;
        self.reviewed += 1;
        self.current = pick_next_card(&self.cards, now);
        Ok(())
    }

    /// Replace the current card's note and save. The card stays on screen.
    pub fn set_note(&mut self, note: &str) -> Fallible<()> {
        let Some(index) = self.current else {
            return fail("no card to annotate.");
        };
        self.cards[index].note = note.to_string();
        self.store.save_cards(&self.cards)?;
        Ok(())
    }

    /// Look for a due card again, e.g. after waiting on a quick repeat.
    pub fn refresh(&mut self, now: Timestamp) {
        self.current = pick_next_card(&self.cards, now);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::types::progress::Stage;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn later(now: Timestamp, minutes: i64) -> Timestamp {
        Timestamp::new(now.into_inner() + Duration::minutes(minutes))
    }

    fn deck(now: Timestamp) -> Vec<Card> {
        (1..=3)
            .map(|n| {
                Card::new(
                    n,
                    format!("Name {n}"),
                    format!("Transliteration {n}"),
                    format!("Meaning {n}"),
                    now,
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_session() {
        let now = ts("2026-01-10T12:00:00Z");
        let mut session = Session::new(MemoryStore::default(), Vec::new(), now);
        assert!(session.current().is_none());
        assert!(session.grade(4.0, now).is_err());
        assert!(session.set_note("x").is_err());
        assert_eq!(session.store.saves, 0);
    }

    #[test]
    fn test_load() -> Fallible<()> {
        let now = ts("2026-01-10T12:00:00Z");
        let session = Session::load(MemoryStore::new(deck(now)), now)?;
        assert_eq!(session.cards().len(), 3);
        assert_eq!(session.current().map(|card| card.number), Some(1));
        Ok(())
    }

    #[test]
    fn test_grade_saves_and_moves_on() -> Fallible<()> {
        let now = ts("2026-01-10T12:00:00Z");
        let mut session = Session::new(MemoryStore::default(), deck(now), now);
        session.grade(5.0, now)?;
        assert_eq!(session.reviewed(), 1);
        assert_eq!(session.store.saves, 1);
        assert_eq!(session.store.cards[0].progress.stage, Stage::Review);
        assert_eq!(session.current().map(|card| card.number), Some(2));
        Ok(())
    }

    #[test]
    fn test_quick_repeat_comes_back_first() -> Fallible<()> {
        let now = ts("2026-01-10T12:00:00Z");
        let mut session = Session::new(MemoryStore::default(), deck(now), now);
        // Card 1 goes to the one-minute repeat.
        session.grade(1.0, now)?;
        assert_eq!(session.current().map(|card| card.number), Some(2));
        session.refresh(later(now, 2));
        assert_eq!(session.current().map(|card| card.number), Some(1));
        Ok(())
    }

    #[test]
    fn test_drains_the_queue() -> Fallible<()> {
        let now = ts("2026-01-10T12:00:00Z");
        let mut session = Session::new(MemoryStore::default(), deck(now), now);
        while session.current().is_some() {
            session.grade(5.0, now)?;
        }
        assert_eq!(session.reviewed(), 3);
        let summary = session.summary(now);
        assert_eq!(summary.new_count, 0);
        assert_eq!(summary.reviewing_count, 0);
        assert!(summary.next_upcoming.is_some());
        Ok(())
    }

    #[test]
    fn test_set_note() -> Fallible<()> {
        let now = ts("2026-01-10T12:00:00Z");
        let mut session = Session::new(MemoryStore::default(), deck(now), now);
        session.set_note("sounds like a river")?;
        assert_eq!(session.store.cards[0].note, "sounds like a river");
        assert_eq!(session.current().map(|card| card.number), Some(1));
        assert_eq!(session.reviewed(), 0);
        Ok(())
    }
}
