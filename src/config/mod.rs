//! Environment-driven configuration.
//!
//! Each submodule owns one aspect of configuration, loaded from environment
//! variables with sensible development defaults:
//!
//! - [`cors`]: allowed origins
//! - [`database`]: PostgreSQL pool initialization (`DATABASE_URL`)
//! - [`jwt`]: token secret and expiry
//! - [`storage`]: upload directory and public file URL

pub mod cors;
pub mod database;
pub mod jwt;
pub mod storage;
