//! agenda - Task Manager Library
//!
//! This library provides the core functionality for the agenda CLI tool: a
//! single-user task manager whose views group tasks by due-date proximity.
//!
//! # Core Concepts
//!
//! - **Tasks**: the sole entity, holding a description, a completion flag,
//!   an optional due date, and an optional project assignment
//! - **Store**: an embedded JSON snapshot with create/read-all/update/delete
//!   by auto-assigned numeric id
//! - **Buckets**: the fixed display groups (Today, Tomorrow, Next 7 days,
//!   Upcoming, Unscheduled) computed from due dates
//! - **Board**: an interactive grouped view with optimistic updates that
//!   revert via re-fetch when a write fails
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `agenda.toml` (project catalog)
//! - `error`: Error types and result aliases
//! - `lock`: File locking for store mutations
//! - `output`: Human and JSON output formatting
//! - `schedule`: Due-date bucketing (the pure classifier)
//! - `storage`: Data directory layout and atomic file I/O
//! - `task`: Task model and store adapter
//! - `ui`: The interactive board

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod schedule;
pub mod storage;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
