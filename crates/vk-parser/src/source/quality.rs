use serde::{Deserialize, Serialize};
use std::fmt;

/// Progressive-download quality levels served by VK video pages.
///
/// Serializes to the bare numeric label (`"240"`, `"360"`, ...), so the
/// enum can be used directly as a JSON map key.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quality {
    #[serde(rename = "240")]
    P240,
    #[serde(rename = "360")]
    P360,
    #[serde(rename = "480")]
    P480,
    #[serde(rename = "720")]
    P720,
    #[serde(rename = "1080")]
    P1080,
}

impl Quality {
    /// Scan order of the extraction rules, lowest quality first.
    pub const ALL: [Quality; 5] = [
        Quality::P240,
        Quality::P360,
        Quality::P480,
        Quality::P720,
        Quality::P1080,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::P240 => "240",
            Quality::P360 => "360",
            Quality::P480 => "480",
            Quality::P720 => "720",
            Quality::P1080 => "1080",
        }
    }

    pub fn from_str(label: &str) -> Option<Self> {
        match label {
            "240" => Some(Quality::P240),
            "360" => Some(Quality::P360),
            "480" => Some(Quality::P480),
            "720" => Some(Quality::P720),
            "1080" => Some(Quality::P1080),
            _ => None,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.as_str())
    }
}
