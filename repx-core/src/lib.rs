//! RepX Core
//!
//! Core types for the RepX video judging system.
//!
//! This crate contains:
//! - Domain types: disciplines, frames, judgments and judgment jobs
//! - Regulations: the static rulebook the judge evaluates attempts against
//! - DTOs: the JSON shapes exchanged between the server and its clients

pub mod domain;
pub mod dto;
pub mod error;
pub mod regulations;

pub use error::InputError;
