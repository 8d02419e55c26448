//! # cm-core
//!
//! Shared types and utilities for the CM trader profiling workspace.
//!
//! This crate provides the foundational building blocks used by every other
//! crate: the normalized [`Fill`](types::Fill) record, millisecond
//! timestamps, layered configuration, and the logging framework.

pub mod config;
pub mod logging;
pub mod types;
