//! Core types and the filtering engine for the roster of interns and NSS
//! personnel.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod date;
pub mod engine;
pub mod error;
pub mod filter;
pub mod person;
pub mod search;
pub mod sort;
pub mod state;
pub mod status;
pub mod store;

pub use engine::FilterCounts;
pub use error::{Error, Result};
pub use filter::FilterConfig;
pub use person::{Intern, NewPerson, NssPerson, Person, PersonId, RecordKind};
pub use state::StateStore;
