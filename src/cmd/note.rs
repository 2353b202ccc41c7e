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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::CardStore;
use crate::types::timestamp::Timestamp;

pub fn set_note(number: u32, text: String, directory: Option<String>) -> Fallible<()> {
    let mut coll = Collection::new(directory, Timestamp::now())?;
    let Some(card) = coll.cards.iter_mut().find(|card| card.number == number) else {
        return fail(format!("no card numbered {number}."));
    };
    card.note = text;
    coll.db.save_cards(&coll.cards)?;
    println!("ok");
    Ok(())
}
