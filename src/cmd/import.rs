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

use std::collections::HashSet;
use std::path::PathBuf;

use crate::collection::Collection;
use crate::dataset::load_dataset;
use crate::error::Fallible;
use crate::store::CardStore;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

pub fn import_dataset(file: PathBuf, directory: Option<String>) -> Fallible<()> {
    let now = Timestamp::now();
    let mut coll = Collection::new(directory, now)?;
    let incoming = load_dataset(&file, now)?;
    let added = merge_cards(&mut coll.cards, incoming);
    if added > 0 {
        coll.db.save_cards(&coll.cards)?;
    }
    log::info!("Imported {added} cards from {}.", file.display());
    println!("Added {added} new cards.");
    Ok(())
}

/// Append the incoming cards whose number isn't in the collection yet.
/// Cards already present are left alone. Returns how many were added.
fn merge_cards(cards: &mut Vec<Card>, incoming: Vec<Card>) -> usize {
    let mut known: HashSet<u32> = cards.iter().map(|card| card.number).collect();
    let before = cards.len();
    for card in incoming {
        if known.insert(card.number) {
            cards.push(card);
        }
    }
    cards.len() - before
}
