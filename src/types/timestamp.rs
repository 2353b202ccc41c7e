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

use chrono::DateTime;
use chrono::Local;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Serialize;
use serde::Serializer;

use crate::types::date::Date;

/// An absolute instant. Stored and printed as RFC 3339 in UTC; calendar
/// questions ("which day is it?") are answered in the local timezone.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(ts: DateTime<Utc>) -> Self {
        Self(ts)
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    /// Parse a stored timestamp. Accepts RFC 3339, and bare `YYYY-MM-DD`
    /// dates, which are read as midnight UTC.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(ts.with_timezone(&Utc)));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Self(naive.and_utc()))
    }

    /// The calendar day this instant falls on, in the local timezone.
    pub fn local_date(self) -> Date {
        let ts = self.0.with_timezone(&Local);
        Date::new(ts.date_naive())
    }

    pub fn to_rfc3339(self) -> String {
        self.0.to_rfc3339()
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let local = self.0.with_timezone(&Local);
        write!(f, "{}", local.format("%a %b %-d, %H:%M"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let ts = Timestamp::parse("2026-01-10T12:00:00.000Z");
        let expected = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        assert_eq!(ts, Some(Timestamp::new(expected)));
    }

    #[test]
    fn test_parse_offset() {
        let ts = Timestamp::parse("2026-01-10T14:00:00+02:00");
        let expected = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        assert_eq!(ts, Some(Timestamp::new(expected)));
    }

    #[test]
    fn test_parse_bare_date() {
        let ts = Timestamp::parse("2026-01-09");
        let expected = Utc.with_ymd_and_hms(2026, 1, 9, 0, 0, 0).unwrap();
        assert_eq!(ts, Some(Timestamp::new(expected)));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(Timestamp::parse("not a date"), None);
        assert_eq!(Timestamp::parse(""), None);
    }

    #[test]
    fn test_ordering() {
        let a = Timestamp::parse("2026-01-09T08:00:00Z").unwrap();
        let b = Timestamp::parse("2026-01-10T07:00:00Z").unwrap();
        assert!(a < b);
    }
}
