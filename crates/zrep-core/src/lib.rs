//! ZREP base primitives and schemas.

/// Foundational primitive types: commitments and tree depth.
pub mod base;
/// Group identities: providers and group names.
pub mod group;
/// Serialized/public schema models used across the workspace.
pub mod schema;
