//! services/api/src/lib.rs
//!
//! The api service library: adapters, configuration, errors, and the web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
