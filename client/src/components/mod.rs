//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read session state from Leptos context providers installed by
//! `session` and render guard outcomes and toasts; `pagination` needs no
//! context.

pub mod pagination;
pub mod protected_route;
pub mod session;
pub mod toast_stack;
