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

/// Recall quality on the SM-2 scale: 0 (blackout) to 5 (effortless).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;

    /// Clamp an arbitrary grade into `0..=5`, rounding to the nearest
    /// integer. Non-finite input is a blackout.
    pub fn clamp(raw: f64) -> Self {
        if !raw.is_finite() || raw < 0.0 {
            return Self(0);
        }
        if raw > Self::MAX as f64 {
            return Self(Self::MAX);
        }
        Self(raw.round() as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// A review-stage grade below this is a lapse.
    pub fn is_lapse(self) -> bool {
        self.0 < 3
    }

    /// Grades at or above this count as a pass for `last_passed_date`.
    pub fn is_pass(self) -> bool {
        self.0 >= 4
    }
}

/// The four buttons offered to the learner.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Grade {
    VeryHard,
    Hard,
    Good,
    Easy,
}

impl Grade {
    pub fn quality(self) -> f64 {
        match self {
            Grade::VeryHard => 1.0,
            Grade::Hard => 2.0,
            Grade::Good => 4.0,
            Grade::Easy => 5.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::VeryHard => "very hard",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }

    /// Map a keypress (`1`-`4`) to a grade.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "1" => Some(Grade::VeryHard),
            "2" => Some(Grade::Hard),
            "3" => Some(Grade::Good),
            "4" => Some(Grade::Easy),
            _ => None,
        }
    }
}
