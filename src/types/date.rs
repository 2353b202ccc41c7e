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

use chrono::Local;
use chrono::NaiveDate;
use chrono::TimeZone;
use chrono::Utc;
use serde::Serialize;
use serde::Serializer;

use crate::types::timestamp::Timestamp;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar day, used as the key for "was this card reviewed today?".
/// Two instants are on the same day iff their day keys are equal, which is
/// not the same thing as being less than 24 hours apart.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Date(NaiveDate);

impl Date {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a `YYYY-MM-DD` day key.
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s.trim(), DAY_KEY_FORMAT)
            .ok()
            .map(Self)
    }

    pub fn succ(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// The first instant of this day in the local timezone.
    pub fn start(self) -> Option<Timestamp> {
        let midnight = self.0.and_hms_opt(0, 0, 0)?;
        Local
            .from_local_datetime(&midnight)
            .earliest()
            .map(|ts| Timestamp::new(ts.with_timezone(&Utc)))
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DAY_KEY_FORMAT))
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_key_is_zero_padded() {
        let date = Date::new(NaiveDate::from_ymd_opt(2026, 1, 9).unwrap());
        assert_eq!(date.to_string(), "2026-01-09");
    }

    #[test]
    fn test_parse() {
        let date = Date::parse("2026-03-01").unwrap();
        assert_eq!(date, Date::new(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
        assert!(Date::parse("yesterday").is_none());
        assert!(Date::parse("2026-02-30").is_none());
    }

    #[test]
    fn test_succ_rolls_over_year() {
        let date = Date::parse("2025-12-31").unwrap();
        assert_eq!(date.succ().unwrap().to_string(), "2026-01-01");
    }

    #[test]
    fn test_start_is_on_the_same_day() {
        let date = Date::parse("2026-01-15").unwrap();
        let start = date.start().unwrap();
        assert_eq!(start.local_date(), date);
    }
}
