//! CC Manager Core
//!
//! Core types shared by the CC Manager client crates.
//!
//! This crate contains:
//! - Domain types: the remote task queue's entities (Task, Worker)
//! - DTOs: request/response bodies exchanged with the task server

pub mod domain;
pub mod dto;
