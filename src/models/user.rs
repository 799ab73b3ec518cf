use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use super::UserId;

/// Self-reported gender of a user, used to build recommendation cohorts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Cis man
    M,
    /// Cis woman
    F,
    /// Trans man
    Tm,
    /// Trans woman
    Tw,
    Nonbinary,
    Other,
}

impl Gender {
    /// Canonical storage code
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::M => "m",
            Gender::F => "f",
            Gender::Tm => "tm",
            Gender::Tw => "tw",
            Gender::Nonbinary => "nonbinary",
            Gender::Other => "other",
        }
    }

    /// Every storage code that parses to this gender.
    ///
    /// Older rows store nonbinary users as `nb_gf`, so cohort queries must match
    /// both spellings.
    pub fn storage_codes(&self) -> &'static [&'static str] {
        match self {
            Gender::M => &["m"],
            Gender::F => &["f"],
            Gender::Tm => &["tm"],
            Gender::Tw => &["tw"],
            Gender::Nonbinary => &["nonbinary", "nb_gf", "nb"],
            Gender::Other => &["other"],
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gender code: {0:?}")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" => Ok(Gender::M),
            "f" => Ok(Gender::F),
            "tm" => Ok(Gender::Tm),
            "tw" => Ok(Gender::Tw),
            "nonbinary" | "nb_gf" | "nb" => Ok(Gender::Nonbinary),
            "other" => Ok(Gender::Other),
            _ => Err(UnknownGender(s.to_string())),
        }
    }
}

/// Demographic profile the engine reads to pick a cohort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub age: u32,
    pub gender: Gender,
}

impl UserProfile {
    pub fn new(user_id: UserId, age: u32, gender: Gender) -> Self {
        Self {
            user_id,
            age,
            gender,
        }
    }
}
