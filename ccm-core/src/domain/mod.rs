//! Core domain types
//!
//! Mirrors of the entities owned by the remote task server. The client never
//! mutates these in place; it only replaces them with freshly fetched copies.

pub mod id;
pub mod task;
pub mod worker;

mod timestamp;
