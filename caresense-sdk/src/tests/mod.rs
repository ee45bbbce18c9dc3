//! Service-level tests for the CareSense SDK
//!
//! This module contains tests that exercise the clients against mock
//! backends and the engines against fake services.

pub mod directory_mock_tests;
