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

use rusqlite::Connection;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::params;
use rusqlite::types::ValueRef;
use serde_json::Value;
use serde_json::json;

use crate::dataset::CardRecord;
use crate::error::Fallible;
use crate::store::CardStore;
use crate::types::card::Card;
use crate::types::progress::ProgressRecord;
use crate::types::timestamp::Timestamp;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        {
            let tx = conn.transaction()?;
            if !schema_exists(&tx)? {
                log::debug!("Creating schema in {database_path}.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    pub fn card_count(&self) -> Fallible<usize> {
        let count: i64 = self
            .conn
            .query_row("select count(*) from cards;", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl CardStore for Database {
    fn load_cards(&self) -> Fallible<Vec<Card>> {
        let now = Timestamp::now();
        let sql = "select number, name, transliteration, meaning, stage, repetitions, interval, easiness, learning_step, next_interval_minutes, next_interval_days, last_reviewed_date, last_passed_date, next_review, note from cards order by position;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            let record = read_record(row)?;
            cards.push(record.normalize(cards.len(), now));
        }
        log::debug!("Loaded {} cards.", cards.len());
        Ok(cards)
    }

    fn save_cards(&mut self, cards: &[Card]) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        tx.execute("delete from cards;", [])?;
        for (position, card) in cards.iter().enumerate() {
            insert_card(&tx, position, card)?;
        }
        tx.commit()?;
        log::debug!("Saved {} cards.", cards.len());
        Ok(())
    }
}

/// Read a row without trusting its column types: a value of the wrong kind
/// counts as missing, and normalization fills it in.
fn read_record(row: &Row) -> Fallible<CardRecord> {
    let card_data = ProgressRecord {
        stage: text(row.get_ref(4)?).map(Value::String),
        repetitions: number(row.get_ref(5)?),
        interval: number(row.get_ref(6)?),
        easiness: number(row.get_ref(7)?),
        learning_step: number(row.get_ref(8)?),
        next_interval_minutes: number(row.get_ref(9)?),
        next_interval_days: number(row.get_ref(10)?),
        last_reviewed_date: text(row.get_ref(11)?),
        last_passed_date: text(row.get_ref(12)?),
    };
    Ok(CardRecord {
        number: number(row.get_ref(0)?),
        name: text(row.get_ref(1)?),
        transliteration: text(row.get_ref(2)?),
        en: text(row.get_ref(3)?).map(|meaning| json!({ "meaning": meaning })),
        translation: None,
        meaning: None,
        card_data: Some(card_data),
        next_review: text(row.get_ref(13)?),
        user_note: text(row.get_ref(14)?),
    })
}

fn number(value: ValueRef<'_>) -> Option<f64> {
    match value {
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => Some(f),
        _ => None,
    }
}

fn text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

fn insert_card(tx: &Transaction, position: usize, card: &Card) -> Fallible<()> {
    let sql = "insert into cards (position, number, name, transliteration, meaning, stage, repetitions, interval, easiness, learning_step, next_interval_minutes, next_interval_days, last_reviewed_date, last_passed_date, next_review, note) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);";
    let progress = &card.progress;
    tx.execute(
        sql,
        params![
            position as i64,
            card.number,
            &card.name,
            &card.transliteration,
            &card.meaning,
            progress.stage.as_str(),
            progress.repetitions,
            progress.interval,
            progress.easiness,
            progress.learning_step,
            progress.next_interval_minutes,
            progress.next_interval_days,
            progress.last_reviewed_date.map(|date| date.to_string()),
            progress.last_passed_date.map(|date| date.to_string()),
            card.next_review.to_text(),
            &card.note,
        ],
    )?;
    Ok(())
}

fn schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["cards"], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::scheduler::review_card;
    use crate::types::card::NextReview;
    use crate::types::date::Date;
    use crate::types::progress::DEFAULT_PROGRESS;
    use crate::types::progress::Stage;

    fn open(dir: &tempfile::TempDir) -> Fallible<Database> {
        let path = dir.path().join("namecards.db");
        Database::new(path.to_str().unwrap())
    }

    fn sample(now: Timestamp) -> Vec<Card> {
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
    fn test_empty_database() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open(&dir)?;
        assert_eq!(db.card_count()?, 0);
        assert!(db.load_cards()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Fallible<()> {
        let dir = tempdir()?;
        let now = Timestamp::parse("2026-01-10T12:00:00Z").unwrap();
        let mut cards = sample(now);
        review_card(&mut cards[1], 5.0, now);
        cards[2].note = "a note".to_string();
        cards[0].next_review = NextReview::parse("not a date");

        let mut db = open(&dir)?;
        db.save_cards(&cards)?;
        assert_eq!(db.card_count()?, 3);
        drop(db);

        let db = open(&dir)?;
        let loaded = db.load_cards()?;
        assert_eq!(loaded, cards);
        Ok(())
    }

    #[test]
    fn test_save_replaces() -> Fallible<()> {
        let dir = tempdir()?;
        let now = Timestamp::parse("2026-01-10T12:00:00Z").unwrap();
        let mut db = open(&dir)?;
        db.save_cards(&sample(now))?;
        db.save_cards(&sample(now)[..1])?;
        assert_eq!(db.card_count()?, 1);
        Ok(())
    }

    #[test]
    fn test_wrong_column_types_are_normalized() -> Fallible<()> {
        let dir = tempdir()?;
        let now = Timestamp::parse("2026-01-10T12:00:00Z").unwrap();
        let mut db = open(&dir)?;
        db.save_cards(&sample(now)[..1])?;
        db.conn.execute(
            "update cards set repetitions = 'many', easiness = 'x', stage = null, interval = 3, last_passed_date = '2026-01-09', last_reviewed_date = 7;",
            [],
        )?;
        let card = &db.load_cards()?[0];
        assert_eq!(card.progress.repetitions, 0);
        assert_eq!(card.progress.easiness, DEFAULT_PROGRESS.easiness);
        assert_eq!(card.progress.stage, Stage::Review);
        assert_eq!(card.progress.interval, 3);
        assert_eq!(card.progress.last_reviewed_date, Date::parse("2026-01-09"));
        Ok(())
    }
}
