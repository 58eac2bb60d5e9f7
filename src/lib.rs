//! tasklist - task-list manager library
//!
//! A to-do server with a crash-safe JSON store, its HTTP API, and the CLI
//! client that talks to it.
//!
//! # Core Concepts
//!
//! - **Tasks**: records with an id, title, optional category and due date
//! - **Repository**: the single source of truth for tasks; every mutation is
//!   written to disk atomically and rolled back in memory if the write fails
//! - **Service**: validation, timestamps and partial updates
//!
//! # Module Organization
//!
//! - `task`: Task record and service inputs
//! - `repo`: Repository trait
//! - `storage`: File-backed repository
//! - `memory`: In-memory repository
//! - `lock`: File locking and atomic writes
//! - `service`: Task service
//! - `api`: HTTP API using axum
//! - `client`: HTTP client for the API
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `tasklist.toml`
//! - `output`: Human and JSON output for the CLI
//! - `error`: Error types and result aliases

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod lock;
pub mod memory;
pub mod output;
pub mod repo;
pub mod service;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
