// THEORY:
// `ActivityLabel` is the engine's entire output vocabulary. The set is closed and
// every frame maps to exactly one label, with `Stable` as the fallback. Labels
// display and serialize as the human-readable names hosts show to users.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed vocabulary of activities the engine can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActivityLabel {
    Standing,
    Movement,
    #[serde(rename = "Raising Hands")]
    RaisingHands,
    Waving,
    Sitting,
    Squatting,
    /// Nothing matched, or the frame was not usable.
    #[default]
    Stable,
}

impl ActivityLabel {
    pub const ALL: [ActivityLabel; 7] = [
        Self::Standing,
        Self::Movement,
        Self::RaisingHands,
        Self::Waving,
        Self::Sitting,
        Self::Squatting,
        Self::Stable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standing => "Standing",
            Self::Movement => "Movement",
            Self::RaisingHands => "Raising Hands",
            Self::Waving => "Waving",
            Self::Sitting => "Sitting",
            Self::Squatting => "Squatting",
            Self::Stable => "Stable",
        }
    }
}

impl fmt::Display for ActivityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown activity label: {s}"))
    }
}
