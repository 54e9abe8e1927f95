//! # Literature Grounding
//!
//! Finds the arXiv papers collaborator output mentions and links them to
//! hypotheses. [`ReferenceExtractor`] normalizes identifiers out of free
//! text; [`ReferenceLinker`] attaches the new ones to the population store
//! and mirrors each link through the session sink, looking up paper
//! metadata along the way.

mod error;
mod extract;
mod linker;

pub use error::{LiteratureError, Result};
pub use extract::{ArxivId, ReferenceExtractor};
pub use linker::ReferenceLinker;
