//! Networking modules for the auth-service REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` normalizes responses into envelopes, `auth_api` names the auth
//! endpoints, `transport` moves bytes, and `types` defines the wire schema.

pub mod api;
pub mod auth_api;
pub mod transport;
pub mod types;
