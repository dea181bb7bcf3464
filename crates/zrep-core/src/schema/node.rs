use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::base::Commitment;
use crate::group::{GroupName, Provider};

/// A persisted Merkle tree node.
///
/// Records are unique on `(provider, name, level, index)`. Level 0 holds
/// leaves; the configured depth holds the single root at index 0.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NodeRecord {
    /// External identity source of the owning group.
    pub provider: Provider,
    /// Group name within the provider.
    #[serde_as(as = "DisplayFromStr")]
    #[schemars(with = "String")]
    pub name: GroupName,
    /// Node level, `0..=depth`.
    pub level: u8,
    /// Node index within its level.
    pub index: u64,
    /// Node hash as a canonical hex field element.
    #[serde_as(as = "DisplayFromStr")]
    #[schemars(with = "String")]
    pub hash: Commitment,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::ReputationLevel;

    #[test]
    fn serializes_with_string_fields() {
        let record = NodeRecord {
            provider: Provider::Twitter,
            name: GroupName::Reputation(ReputationLevel::Gold),
            level: 0,
            index: 3,
            hash: Commitment::from(7_u64),
        };

        let json = serde_json::to_value(&record).expect("record should serialize");
        assert_eq!(json["provider"], "twitter");
        assert_eq!(json["name"], "gold");
        assert_eq!(json["hash"], Commitment::from(7_u64).to_hex());

        let back: NodeRecord = serde_json::from_value(json).expect("record should deserialize");
        assert_eq!(back, record);
    }
}
