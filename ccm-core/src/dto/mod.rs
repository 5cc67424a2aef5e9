//! Data Transfer Objects for communication with the task server
//!
//! Request and response bodies that are not domain entities themselves.

pub mod health;
pub mod task;
