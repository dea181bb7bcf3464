//! The two-input hash over the commitment field.

use halo2_gadgets::poseidon::primitives::{self as poseidon, ConstantLength, P128Pow5T3};
use pasta_curves::pallas;
use zrep_core::base::Commitment;

/// A deterministic two-input hash over the commitment field.
///
/// Every non-leaf node and every zero-hash level is derived through this
/// function. Implementations must be total and deterministic; the engine
/// only ever feeds canonical field elements.
pub trait FieldHasher {
    /// Hash an ordered pair of field elements into one.
    fn hash(&self, left: &Commitment, right: &Commitment) -> Commitment;
}

impl<T: FieldHasher + ?Sized> FieldHasher for &T {
    fn hash(&self, left: &Commitment, right: &Commitment) -> Commitment {
        (**self).hash(left, right)
    }
}

/// Poseidon over the Pallas base field.
///
/// Uses the `P128Pow5T3` parametrization with a constant-length
/// two-element domain, the same primitive membership circuits evaluate
/// in-circuit, so paths verify against circuit-side hashing without
/// translation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoseidonHasher;

impl FieldHasher for PoseidonHasher {
    fn hash(&self, left: &Commitment, right: &Commitment) -> Commitment {
        let digest = poseidon::Hash::<pallas::Base, P128Pow5T3, ConstantLength<2>, 3, 2>::init()
            .hash([left.to_base(), right.to_base()]);
        Commitment::from_base(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let a = Commitment::from(1_u64);
        let b = Commitment::from(2_u64);

        assert_eq!(PoseidonHasher.hash(&a, &b), PoseidonHasher.hash(&a, &b));
    }

    #[test]
    fn order_matters() {
        let a = Commitment::from(1_u64);
        let b = Commitment::from(2_u64);

        assert_ne!(PoseidonHasher.hash(&a, &b), PoseidonHasher.hash(&b, &a));
    }

    #[test]
    fn digest_differs_from_inputs() {
        let a = Commitment::from(1_u64);
        let b = Commitment::from(2_u64);
        let digest = PoseidonHasher.hash(&a, &b);

        assert_ne!(digest, a);
        assert_ne!(digest, b);
    }
}
