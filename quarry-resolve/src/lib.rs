//! Command-line resolution for Quarry.
//!
//! The [`Resolver`] turns raw arguments into a [`ResolvedConfig`] by merging
//! global and adapter option schemas, tokenizing the argument vector and
//! coercing every supplied value through its schema.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod resolved;
mod resolver;
mod scan;

pub use error::ParseError;
pub use resolved::{CONN_STR, ResolvedConfig};
pub use resolver::Resolver;
