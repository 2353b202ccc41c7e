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
use serde::Deserializer;
use serde_json::Value;

use crate::error::Fallible;
use crate::error::fail;
use crate::lenient::is_truthy;
use crate::lenient::lenient_number;
use crate::lenient::lenient_string;
use crate::types::card::Card;
use crate::types::card::NextReview;
use crate::types::progress::ProgressRecord;
use crate::types::timestamp::Timestamp;

/// A card as found in a dataset file or a store row, before normalization.
#[derive(Clone, Default, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    #[serde(default, deserialize_with = "lenient_number")]
    pub number: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub transliteration: Option<String>,
    /// Either the meaning itself, or an object with a `meaning` key.
    #[serde(default)]
    pub en: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub translation: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub meaning: Option<String>,
    #[serde(default, deserialize_with = "lenient_progress")]
    pub card_data: Option<ProgressRecord>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub next_review: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_note: Option<String>,
}

impl CardRecord {
    /// Build a canonical card. `position` is the record's 0-based place in
    /// its list, used when it has no usable number.
    pub fn normalize(self, position: usize, now: Timestamp) -> Card {
        let number = self
            .number
            .filter(|n| n.is_finite() && n.round() >= 1.0)
            .map(|n| n.round() as u32)
            .unwrap_or(position as u32 + 1);
        let meaning = self.meaning_text();
        let name = non_empty(self.name).unwrap_or_else(|| "Name unavailable".to_string());
        let transliteration =
            non_empty(self.transliteration).unwrap_or_else(|| format!("Name {number}"));
        let progress = self.card_data.unwrap_or_default().normalize();
        let next_review = match non_empty(self.next_review) {
            Some(text) => NextReview::parse(&text),
            None => NextReview::At(now),
        };
        Card {
            number,
            name,
            transliteration,
            meaning,
            progress,
            next_review,
            note: self.user_note.unwrap_or_default(),
        }
    }

    fn meaning_text(&self) -> String {
        let unavailable = || "Meaning unavailable".to_string();
        match self.en.as_ref().filter(|en| is_truthy(en)) {
            // Without `en`, the flat `meaning` field is the only source.
            None => return non_empty(self.meaning.clone()).unwrap_or_else(unavailable),
            Some(Value::String(s)) => return s.clone(),
            Some(Value::Object(map)) => {
                if let Some(Value::String(s)) = map.get("meaning") {
                    return s.clone();
                }
            }
            Some(_) => {}
        }
        self.translation.clone().unwrap_or_else(unavailable)
    }
}

/// The two accepted layouts: the API envelope, or a bare list.
#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Envelope { data: Vec<Value> },
    List(Vec<Value>),
}

/// Parse a dataset. Items that aren't objects are normalized as empty
/// records, so every item yields a card.
pub fn parse_dataset(json: &str, now: Timestamp) -> Fallible<Vec<Card>> {
    let items = match serde_json::from_str::<DatasetFile>(json) {
        Ok(DatasetFile::Envelope { data }) => data,
        Ok(DatasetFile::List(items)) => items,
        Err(_) => {
            // Surface the underlying syntax error, if there is one.
            let _: Value = serde_json::from_str(json)?;
            return fail("dataset must be a list of cards, or an object with a `data` list.");
        }
    };
    let cards = items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            let record: CardRecord = serde_json::from_value(item).unwrap_or_default();
            record.normalize(position, now)
        })
        .collect();
    Ok(cards)
}

pub fn load_dataset(path: &Path, now: Timestamp) -> Fallible<Vec<Card>> {
    log::debug!("Reading dataset from {}.", path.display());
    let json = read_to_string(path)?;
    let cards = parse_dataset(&json, now)?;
    log::debug!("Dataset has {} cards.", cards.len());
    Ok(cards)
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

fn lenient_progress<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ProgressRecord>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
