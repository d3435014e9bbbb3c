//! Credential wrappers that keep OAuth secrets out of logs.

pub mod secret;

pub use secret::*;
