//! Group identities: provider and group name pairs.
//!
//! A group is one `(provider, name)` pair and owns exactly one Merkle
//! tree. OAuth providers own one group per reputation tier; the POAP
//! provider owns one group per event. The engine never creates group
//! records: a pairing either is recognized here or the operation fails.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// External identity source backing a set of groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Twitter OAuth accounts.
    Twitter,
    /// Github OAuth accounts.
    Github,
    /// Reddit OAuth accounts.
    Reddit,
    /// POAP token holders.
    Poap,
}

/// Reputation tier of an OAuth-provider group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReputationLevel {
    /// Highest tier.
    Gold,
    /// Middle tier.
    Silver,
    /// Entry tier.
    Bronze,
    /// Accounts below the bronze criteria.
    NotSufficient,
}

/// POAP events with a dedicated group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoapEvent {
    /// Devcon 3 attendees.
    Devcon3,
    /// Devcon 4 attendees.
    Devcon4,
}

/// The name half of a group identity.
///
/// Either a fixed reputation tier (OAuth providers) or a
/// provider-specific sub-category (POAP events).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupName {
    /// A fixed reputation tier.
    Reputation(ReputationLevel),
    /// A POAP event group.
    Poap(PoapEvent),
}

/// A group identity: one `(provider, name)` pair owning one Merkle tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Group {
    /// The external identity source.
    pub provider: Provider,
    /// The reputation tier or provider sub-category.
    pub name: GroupName,
}

impl Group {
    /// Create a group identity. Validity is checked by `is_valid`.
    #[must_use]
    pub const fn new(provider: Provider, name: GroupName) -> Self {
        Self { provider, name }
    }

    /// Whether this pairing identifies a recognized group.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(
            (self.provider, self.name),
            (
                Provider::Twitter | Provider::Github | Provider::Reddit,
                GroupName::Reputation(_)
            ) | (Provider::Poap, GroupName::Poap(_))
        )
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Twitter => "twitter",
            Self::Github => "github",
            Self::Reddit => "reddit",
            Self::Poap => "poap",
        };
        f.write_str(name)
    }
}

/// Error parsing a [`Provider`] from its string form.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown provider: {0}")]
pub struct ParseProviderError(String);

impl FromStr for Provider {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "twitter" => Ok(Self::Twitter),
            "github" => Ok(Self::Github),
            "reddit" => Ok(Self::Reddit),
            "poap" => Ok(Self::Poap),
            other => Err(ParseProviderError(other.to_owned())),
        }
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reputation(ReputationLevel::Gold) => "gold",
            Self::Reputation(ReputationLevel::Silver) => "silver",
            Self::Reputation(ReputationLevel::Bronze) => "bronze",
            Self::Reputation(ReputationLevel::NotSufficient) => "not_sufficient",
            Self::Poap(PoapEvent::Devcon3) => "devcon_3",
            Self::Poap(PoapEvent::Devcon4) => "devcon_4",
        };
        f.write_str(name)
    }
}

/// Error parsing a [`GroupName`] from its string form.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown group name: {0}")]
pub struct ParseGroupNameError(String);

impl FromStr for GroupName {
    type Err = ParseGroupNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gold" => Ok(Self::Reputation(ReputationLevel::Gold)),
            "silver" => Ok(Self::Reputation(ReputationLevel::Silver)),
            "bronze" => Ok(Self::Reputation(ReputationLevel::Bronze)),
            "not_sufficient" => Ok(Self::Reputation(ReputationLevel::NotSufficient)),
            "devcon_3" => Ok(Self::Poap(PoapEvent::Devcon3)),
            "devcon_4" => Ok(Self::Poap(PoapEvent::Devcon4)),
            other => Err(ParseGroupNameError(other.to_owned())),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.name)
    }
}
