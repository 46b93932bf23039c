//! Flutter-facing bindings for the ScopeFlow review core.

pub mod api;
