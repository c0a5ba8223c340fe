//! Domain layer: content schemas, portable text and their invariants.

pub mod assets;
pub mod entities;
pub mod error;
pub mod portable_text;
pub mod slug;
pub mod types;
