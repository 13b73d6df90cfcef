use serde::{Deserialize, Serialize};
use std::fmt;

/// The two labels the classifier distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Maps a raw dataset label onto a gender.
    ///
    /// Accepts `m`, `male`, `1`, `boy` and `f`, `female`, `0`, `girl`,
    /// ignoring case and surrounding whitespace. Anything else is `None`.
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "m" | "male" | "1" | "boy" => Some(Gender::Male),
            "f" | "female" | "0" | "girl" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Target index used for the classifier's dataset.
    pub fn class_index(self) -> usize {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
        }
    }

    pub fn from_class_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Gender::Male),
            1 => Some(Gender::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
