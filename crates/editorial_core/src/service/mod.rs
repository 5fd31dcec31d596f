//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and lifecycle decisions into use-case APIs.
//! - Keep CLI/transport layers decoupled from storage details.

pub mod author_directory;
pub mod publication_service;
