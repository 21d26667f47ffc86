//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`auth`, `toast`) on top of the generic
//! observable [`store::Store`], so components depend on small focused models
//! passed through context rather than global singletons.

pub mod auth;
pub mod store;
pub mod toast;
