//! Test utilities and fixtures for luamerge
//!
//! This crate provides shared test helpers that can be used by the
//! integration tests of the core and CLI crates.

pub mod fixtures;
pub mod workspace;
