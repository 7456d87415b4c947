//! Remote data accessor
//!
//! Library module that translates in-memory intents into HTTP calls against the
//! external book-club API and normalizes responses into plain data structures.
pub mod client;
pub mod errors;
pub mod query;
pub mod types;
