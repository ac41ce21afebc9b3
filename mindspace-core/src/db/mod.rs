//! Database layer for mindspace
//!
//! This module provides local storage using SQLite with:
//! - Schema migrations
//! - A key-value table holding whole serialized documents

pub mod repo;
pub mod schema;

pub use repo::Database;
