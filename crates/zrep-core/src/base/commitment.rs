//! Identity commitment field element.
//!
//! A commitment is an element of the Pallas base field. Callers supply
//! commitments as canonical little-endian hex strings; the same encoding
//! is used for every stored tree node, so leaves and internal hashes
//! share one representation.

use std::fmt;
use std::str::FromStr;

use ff::{Field as _, PrimeField as _};
use pasta_curves::pallas;

/// Size in bytes of a canonical commitment encoding.
pub const COMMITMENT_SIZE: usize = 32;

/// An identity commitment, or any tree node hash derived from one.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Commitment(pallas::Base);

impl Commitment {
    /// The canonical "no identity" commitment, the zero field element.
    pub const ZERO: Self = Self(pallas::Base::ZERO);

    /// Wrap a field element.
    #[must_use]
    pub const fn from_base(value: pallas::Base) -> Self {
        Self(value)
    }

    /// The underlying field element.
    #[must_use]
    pub const fn to_base(self) -> pallas::Base {
        self.0
    }

    /// Canonical little-endian byte encoding.
    #[must_use]
    pub fn to_bytes(self) -> [u8; COMMITMENT_SIZE] {
        self.0.to_repr()
    }

    /// Parse a canonical byte encoding.
    ///
    /// Returns `None` if the bytes do not encode a field element.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; COMMITMENT_SIZE]) -> Option<Self> {
        Option::from(pallas::Base::from_repr(*bytes)).map(Self)
    }

    /// Hex string of the canonical byte encoding.
    #[must_use]
    pub fn to_hex(self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl From<u64> for Commitment {
    fn from(value: u64) -> Self {
        Self(pallas::Base::from(value))
    }
}

/// Errors parsing a commitment from its hex string form.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseCommitmentError {
    /// The string is not valid hex of the expected length.
    #[error("commitment must be {COMMITMENT_SIZE} bytes of hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The bytes are not a canonical field element encoding.
    #[error("commitment bytes are not a canonical field element")]
    NonCanonical,
}

impl FromStr for Commitment {
    type Err = ParseCommitmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0_u8; COMMITMENT_SIZE];
        hex::decode_to_slice(s, &mut bytes)?;
        Self::from_bytes(&bytes).ok_or(ParseCommitmentError::NonCanonical)
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", self.to_hex())
    }
}

impl std::hash::Hash for Commitment {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}
