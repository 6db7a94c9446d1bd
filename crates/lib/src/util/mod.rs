//! Shared utilities.
//!
//! Filesystem helpers used by every stage, content fingerprints and test
//! fixtures.

pub mod fs;
pub mod hash;

#[cfg(test)]
pub mod testutil;
