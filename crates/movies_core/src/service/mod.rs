//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own session and transaction boundaries so repositories stay
//!   boundary-agnostic.

pub mod movie_service;
