//! Periodic HTTP endpoint monitor.
//!
//! Each target gets its own poll loop that fetches the URL, times the
//! response, optionally matches the body against a pattern and stores the
//! observation in PostgreSQL.

pub mod config;
pub mod database;
pub mod monitoring;
pub mod pool;
pub mod targets;
