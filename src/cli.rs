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

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::check::check_collection;
use crate::cmd::drill::drill;
use crate::cmd::export::export_collection;
use crate::cmd::import::import_dataset;
use crate::cmd::note::set_note;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Drill the cards that are due.
    Drill {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Add the cards of a dataset file that the collection doesn't have yet.
    Import {
        /// Path to the dataset JSON file.
        file: PathBuf,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Set the note on a card.
    Note {
        /// The card's number.
        number: u32,
        /// The new note. An empty string clears it.
        text: String,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Print the queue counts.
    Stats {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// Print the whole collection as JSON.
    Export {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Check that the collection can be loaded.
    Check {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill { directory } => drill(directory),
        Command::Import { file, directory } => import_dataset(file, directory),
        Command::Note {
            number,
            text,
            directory,
        } => set_note(number, text, directory),
        Command::Stats { directory, format } => print_stats(directory, format),
        Command::Export { directory } => export_collection(directory),
        Command::Check { directory } => check_collection(directory),
    }
}
