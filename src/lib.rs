//! gifstash - Giphy search with a local cache of full resolution originals.
//!
//! The crate is split into a domain layer (entities and ports), an
//! application layer (result pagination and preview prefetching) and an
//! infrastructure layer (the Giphy client, the original cache and
//! configuration).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing services over the domain ports.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "gifstash";
