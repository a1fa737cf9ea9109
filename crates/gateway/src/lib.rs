//! Remote gateway crate for the Vectordeck console.
//!
//! This crate defines the contract the console core depends on (list,
//! create and delete operations for uploaded files and vector stores) and
//! its implementations:
//!
//! # Providers
//! - **Http**: reqwest client against an OpenAI-compatible backend (default)
//! - **Mock**: deterministic in-memory backend for tests and offline use
//!
//! All responses are normalized at this boundary: the wire format's optional
//! fields and mixed list envelopes never leak past the types in this crate.

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export commonly used types
pub use client::{Gateway, ListParams, SortOrder};
pub use factory::create_gateway;
pub use types::{FileCounts, FilePurpose, FileRecord, MemberRecord, VectorStoreRecord};
