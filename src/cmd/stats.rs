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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::selector::QueueSummary;
use crate::selector::summarize;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(directory: Option<String>, format: StatsFormat) -> Fallible<()> {
    let now = Timestamp::now();
    let coll = Collection::new(directory, now)?;
    let stats = get_stats(&coll.cards, now);
    match format {
        StatsFormat::Text => print!("{}", render_text(&stats)),
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{stats_json}");
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    card_count: usize,
    #[serde(flatten)]
    queue: QueueSummary,
}

fn get_stats(cards: &[Card], now: Timestamp) -> Stats {
    Stats {
        card_count: cards.len(),
        queue: summarize(cards, now),
    }
}

fn render_text(stats: &Stats) -> String {
    let next = match stats.queue.next_upcoming {
        Some(next) => next.to_string(),
        None => "none".to_string(),
    };
    format!(
        "Cards:        {}\nNew:          {}\nReviewing:    {}\nDue tomorrow: {}\nNext review:  {}\n",
        stats.card_count,
        stats.queue.new_count,
        stats.queue.reviewing_count,
        stats.queue.due_tomorrow_count,
        next
    )
}
