//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate persisted lists into use-case level APIs.
//! - Keep UI layers decoupled from storage details.

pub mod saved_query_service;
