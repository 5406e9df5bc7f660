//! Datapack documents, the loader that merges them, the save format, and
//! the built-in packs.

pub mod builtin;
pub mod document;
pub mod loader;
pub mod save;

pub use document::{BoardDoc, DatapackDoc, RestrictionDoc, RuleDoc, Topology};
pub use loader::{load, DEFAULT_DIMENSIONS};
pub use save::SaveDoc;
