//! Backend client implementations
//!
//! This module contains the clients for the CareSense triage and doctor
//! directory endpoints.

pub mod directory;
pub mod triage;
pub(crate) mod common;

pub use common::{HttpExecutor, UserAgent, REQUEST_ID_HEADER};
