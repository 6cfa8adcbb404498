//! Tip Pool Engine for restaurant tip sharing
//!
//! This crate splits a meal period's collected tips between two role-based
//! pools and pays each staff member in proportion to the hours they worked,
//! with pool-specific rounding. It also provides the staff roster store, its
//! JSON persistence and an HTTP API around both.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
