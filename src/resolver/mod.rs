//! Definition stream handling.

pub mod definitions;

pub use definitions::{DefinitionResolver, ResolvedDefinitions};
