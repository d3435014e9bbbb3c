//! Provider-facing descriptors.
//!
//! `descriptor` exposes validated endpoint metadata (`ProviderDescriptor`) covering the
//! authorization, token, and user-profile endpoints the relay talks to. Endpoints must use
//! HTTPS unless they point at a loopback host.

pub mod descriptor;

pub use descriptor::*;
