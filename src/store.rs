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
use crate::types::card::Card;

/// Somewhere the whole collection can be read from and written back to.
pub trait CardStore {
    /// Read every card, in stored order.
    fn load_cards(&self) -> Fallible<Vec<Card>>;

    /// Replace the stored collection with `cards`.
    fn save_cards(&mut self, cards: &[Card]) -> Fallible<()>;
}
