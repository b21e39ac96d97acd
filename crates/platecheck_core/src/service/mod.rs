//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate plate and list stores into use-case level APIs.
//! - Keep CLI/transport layers decoupled from storage details.

pub mod membership_service;
