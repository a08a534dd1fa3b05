//! Flutter-facing bindings for the WhereIs core.
//!
//! `api` holds the exported use-case functions; generated bridge glue is
//! produced by `flutter_rust_bridge_codegen` at app build time.

pub mod api;
