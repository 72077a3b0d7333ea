//! # Kickoff Core
//!
//! Domain models and scheduling logic for the Kickoff pursuit-coordination
//! service. This crate is intentionally free of I/O: it defines the shared
//! error taxonomy, the request/response models used by the API layer, and
//! the pure slot-ranking component that turns members' availability
//! proposals into a ranked list of candidate kickoff times.

pub mod errors;
pub mod models;
pub mod scheduling;
