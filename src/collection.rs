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

use std::env::current_dir;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::dataset::load_dataset;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::CardStore;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

pub struct Collection {
    pub directory: PathBuf,
    pub db: Database,
    pub cards: Vec<Card>,
}

impl Collection {
    pub fn new(directory: Option<String>, now: Timestamp) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let config = Config::load(&directory)?;

        let db_path: PathBuf = directory.join(&config.database);
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let mut db: Database = Database::new(db_path)?;

        let cards = {
            log::debug!("Loading cards...");
            let start = Instant::now();
            let cards = db.load_cards()?;
            let duration = start.elapsed().as_millis();
            log::debug!("Cards loaded in {duration}ms.");
            cards
        };

        // An empty collection is seeded from the dataset, if there is one.
        let dataset_path = directory.join(&config.dataset);
        let cards = if cards.is_empty() && dataset_path.exists() {
            let cards = load_dataset(&dataset_path, now)?;
            db.save_cards(&cards)?;
            log::info!("Seeded {} cards from {}.", cards.len(), dataset_path.display());
            cards
        } else {
            cards
        };

        Ok(Self {
            directory,
            db,
            cards,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;
    use crate::config::CONFIG_FILE;

    fn now() -> Timestamp {
        Timestamp::parse("2026-01-10T12:00:00Z").unwrap()
    }

    fn dir_string(dir: &tempfile::TempDir) -> Option<String> {
        Some(dir.path().display().to_string())
    }

    #[test]
    fn test_non_existent_directory() {
        let result = Collection::new(Some("./derpherp".to_string()), now());
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_directory() -> Fallible<()> {
        let dir = tempdir()?;
        let coll = Collection::new(dir_string(&dir), now())?;
        assert!(coll.cards.is_empty());
        assert!(dir.path().join("namecards.db").exists());
        Ok(())
    }

    #[test]
    fn test_seeds_from_dataset_once() -> Fallible<()> {
        let dir = tempdir()?;
        write(
            dir.path().join("names.json"),
            r#"{"data": [{"number": 1, "name": "N1"}, {"number": 2, "name": "N2"}]}"#,
        )?;
        let coll = Collection::new(dir_string(&dir), now())?;
        assert_eq!(coll.cards.len(), 2);
        assert_eq!(coll.db.card_count()?, 2);

        // A changed dataset doesn't touch a collection that already has cards.
        write(dir.path().join("names.json"), r#"[{"number": 9}]"#)?;
        let coll = Collection::new(dir_string(&dir), now())?;
        let numbers: Vec<u32> = coll.cards.iter().map(|card| card.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        Ok(())
    }

    #[test]
    fn test_configured_paths() -> Fallible<()> {
        let dir = tempdir()?;
        write(
            dir.path().join(CONFIG_FILE),
            "database = \"progress.db\"\ndataset = \"asma.json\"\n",
        )?;
        write(dir.path().join("asma.json"), r#"[{"number": 1}]"#)?;
        let coll = Collection::new(dir_string(&dir), now())?;
        assert_eq!(coll.cards.len(), 1);
        assert!(dir.path().join("progress.db").exists());
        assert!(!dir.path().join("namecards.db").exists());
        Ok(())
    }
}
