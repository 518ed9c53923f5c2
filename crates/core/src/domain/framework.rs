use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;

/// Prioritization framework.
///
/// Serialized as the canonical uppercase token (`"RICE"`, `"ICE"`, `"MOSCOW"`,
/// `"KANO"`). Parsing is case-insensitive and ignores surrounding whitespace, so
/// `"MoSCoW"` and `" kano "` are accepted at the boundary.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "UPPERCASE")]
pub enum Framework {
    /// Reach x Impact x Confidence / Effort
    #[default]
    Rice,
    /// Impact, Confidence and Ease
    Ice,
    /// Must / Should / Could
    Moscow,
    /// Basic / Performance / Delighter
    Kano,
}

impl Framework {
    /// All frameworks in canonical order.
    pub const ALL: [Framework; 4] = [Self::Rice, Self::Ice, Self::Moscow, Self::Kano];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rice => "RICE",
            Self::Ice => "ICE",
            Self::Moscow => "MOSCOW",
            Self::Kano => "KANO",
        }
    }

    /// Human-facing spelling of the framework name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Rice => "RICE",
            Self::Ice => "ICE",
            Self::Moscow => "MoSCoW",
            Self::Kano => "Kano",
        }
    }

    /// Whether the framework scores with a category label instead of a formula.
    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::Moscow | Self::Kano)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "RICE" => Some(Self::Rice),
            "ICE" => Some(Self::Ice),
            "MOSCOW" => Some(Self::Moscow),
            "KANO" => Some(Self::Kano),
            _ => None,
        }
    }

    /// Parse a token, falling back to RICE for anything unrecognized.
    ///
    /// The second element is `true` when the fallback was taken.
    pub fn parse_or_default(s: &str) -> (Self, bool) {
        match Self::parse(s) {
            Some(framework) => (framework, false),
            None => (Self::default(), true),
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Framework {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::UnknownFramework(s.trim().to_string()))
    }
}

impl<'de> Deserialize<'de> for Framework {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}
