//! Configuration for the rating pipeline
//!
//! This module handles loading and validation of the identity configuration
//! that the resolver is parameterized with.

pub mod identity;

pub use identity::IdentityConfig;
