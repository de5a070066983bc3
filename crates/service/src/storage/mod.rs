//! Storage abstractions for service layer
//!
//! Only an in-memory store exists; nothing survives a restart.

pub mod memory_store;
