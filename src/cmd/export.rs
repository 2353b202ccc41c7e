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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::card::NextReview;
use crate::types::progress::CardProgress;
use crate::types::timestamp::Timestamp;

pub fn export_collection(directory: Option<String>) -> Fallible<()> {
    let coll: Collection = Collection::new(directory, Timestamp::now())?;
    let json: String = export_json(&coll.cards)?;
    println!("{json}");
    Ok(())
}

/// The collection in the same layout the dataset is read from, so an export
/// can be imported again.
pub fn export_json(cards: &[Card]) -> Fallible<String> {
    let export = Export {
        data: cards.iter().map(CardExport::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

#[derive(Serialize)]
struct Export<'a> {
    data: Vec<CardExport<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardExport<'a> {
    number: u32,
    name: &'a str,
    transliteration: &'a str,
    en: MeaningExport<'a>,
    card_data: &'a CardProgress,
    next_review: &'a NextReview,
    user_note: &'a str,
}

#[derive(Serialize)]
struct MeaningExport<'a> {
    meaning: &'a str,
}

impl<'a> From<&'a Card> for CardExport<'a> {
    fn from(card: &'a Card) -> Self {
        CardExport {
            number: card.number,
            name: &card.name,
            transliteration: &card.transliteration,
            en: MeaningExport {
                meaning: &card.meaning,
            },
            card_data: &card.progress,
            next_review: &card.next_review,
            user_note: &card.note,
        }
    }
}
