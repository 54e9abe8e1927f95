//! # Coscientist CLI
//!
//! The `coscientist` binary: runs hypothesis evolution cycles against a
//! session archive and prints session overviews. Provider wiring, archive
//! bootstrap and plain-text rendering live here; the binary itself only
//! parses flags and dispatches.

pub mod render;
pub mod session;
pub mod wiring;
