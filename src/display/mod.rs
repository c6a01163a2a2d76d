//! # Display Module
//!
//! This module provides e-paper display geometries.
//!
//! ## Modules
//!
//! - [`config`]: Display panel specifications

pub mod config;

pub use config::DisplayConfig;
