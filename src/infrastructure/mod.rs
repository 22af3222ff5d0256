//! Infrastructure Layer - External concerns and implementations
//!
//! This module handles the relational store backing the user resource.

pub mod database;
pub mod repositories;

pub use database::{connect_pool, ensure_schema};
pub use repositories::*;
