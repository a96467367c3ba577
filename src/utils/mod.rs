//! Shared utilities used throughout the application:
//!
//! - [`errors`]: Application error type and HTTP mapping
//! - [`jwt`]: Access token creation and verification
//! - [`password`]: Password hashing and verification
//! - [`storage`]: Course image file storage

pub mod errors;
pub mod jwt;
pub mod password;
pub mod storage;
