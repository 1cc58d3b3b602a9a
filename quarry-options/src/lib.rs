//! Declarative option schemas for the Quarry command line.
//!
//! An [`OptionSchema`] describes one configurable value: its canonical name,
//! the flag spellings that select it, how raw text is coerced into an
//! [`OptionValue`], and which collaborator consumes the result. Global options
//! and adapter-contributed options are combined into an [`OptionSet`], which
//! rejects any two entries claiming the same spelling.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod schema;
mod set;
mod value;

pub use error::{CollisionError, InvalidValue};
pub use schema::{OptionSchema, Target, ValueKind};
pub use set::{Entry, OptionSet, Origin};
pub use value::{Integer, OptionValue};
