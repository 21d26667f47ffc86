//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules hold pure decision logic (guards, validation, pagination,
//! role display) so pages and components stay thin and testable.

pub mod auth;
pub mod pagination;
pub mod roles;
pub mod validators;
