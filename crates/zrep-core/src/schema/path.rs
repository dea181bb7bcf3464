use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::base::Commitment;

/// A Merkle authentication path in leaf-to-root order.
///
/// Both sequences are exactly `depth` long. The parity bit convention is
/// fixed: 0 means the node at that level is a left child, 1 a right
/// child. Proof circuits consume this exact convention.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MerklePath {
    /// Sibling hash at each level.
    #[serde_as(as = "Vec<DisplayFromStr>")]
    #[schemars(with = "Vec<String>")]
    pub path_elements: Vec<Commitment>,
    /// Position parity bit at each level.
    pub indices: Vec<u8>,
}

impl MerklePath {
    /// Number of levels covered by this path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path_elements.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_elements_as_hex_strings() {
        let path = MerklePath {
            path_elements: vec![Commitment::from(1_u64), Commitment::from(2_u64)],
            indices: vec![0, 1],
        };

        let json = serde_json::to_value(&path).expect("path should serialize");
        assert_eq!(json["path_elements"][0], Commitment::from(1_u64).to_hex());
        assert_eq!(json["indices"], serde_json::json!([0, 1]));

        let back: MerklePath = serde_json::from_value(json).expect("path should deserialize");
        assert_eq!(back, path);
        assert_eq!(back.depth(), 2);
    }
}
