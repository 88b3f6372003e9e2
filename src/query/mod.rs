//! Query Layer - Search filters for the line cache
//!
//! A [`SearchFilter`] is translated into a single parameterized predicate
//! which the store executes against the `line` table.

pub mod filter;

pub use filter::{Predicate, SearchFilter, SpeciesFilter, ALL};
