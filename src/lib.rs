//! Purpose: Shared library crate used by the `hyperpage` CLI, server, and tests.
//! Exports: `api` (pager and page models), `core` (loading, indexing, paging, errors), `notice`.
//! Role: Library backing the binary; `api` is the supported surface.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
//! Invariants: Cached state lives only in `api::Pager`.
pub mod api;
pub mod core;
pub mod data_paths;
pub mod notice;
