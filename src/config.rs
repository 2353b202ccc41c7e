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

use crate::error::Fallible;

pub const CONFIG_FILE: &str = "namecards.toml";

/// Per-collection settings, read from `namecards.toml`. Paths are relative
/// to the collection directory.
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database: String,
    pub dataset: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: "namecards.db".to_string(),
            dataset: "names.json".to_string(),
        }
    }
}

impl Config {
    /// Load the config in `directory`, or the defaults if there is none.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        log::debug!("Loaded config from {}.", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file() -> Fallible<()> {
        let dir = tempdir()?;
        assert_eq!(Config::load(dir.path())?, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_file() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join(CONFIG_FILE), "dataset = \"asma.json\"\n")?;
        let config = Config::load(dir.path())?;
        assert_eq!(config.dataset, "asma.json");
        assert_eq!(config.database, "namecards.db");
        Ok(())
    }

    #[test]
    fn test_unknown_key() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join(CONFIG_FILE), "colour = \"green\"\n")?;
        assert!(Config::load(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_malformed_file() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join(CONFIG_FILE), "database = \n")?;
        assert!(Config::load(dir.path()).is_err());
        Ok(())
    }
}
