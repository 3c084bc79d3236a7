//! Memory Match (workspace facade crate).
//!
//! Re-exports the member crates under `crates/` as
//! `memory_match::{types, core, content, engine}`.

pub use memory_match_content as content;
pub use memory_match_core as core;
pub use memory_match_engine as engine;
pub use memory_match_types as types;
