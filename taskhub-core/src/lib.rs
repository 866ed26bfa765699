//! `TaskHub` domain library.
//!
//! Defines the task, user, and grant models shared by the server, the
//! authorization engine that decides who may do what to a task, and the
//! error taxonomy surfaced by every operation. This crate is pure data
//! and decision logic -- no I/O, no async, no global state.

pub mod authz;
pub mod error;
pub mod grant;
pub mod task;
pub mod user;
