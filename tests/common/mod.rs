//! Common test utilities for callfire-rest
//!
//! - Mock server setup for API testing
//! - Request fixtures shared across test files

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_server;
