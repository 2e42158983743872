//! Flutter-facing bindings for the compose engine.

pub mod api;
