//! Test support utilities
//!
//! Mock implementations of the session manager's trait seams, used by unit
//! and integration tests. Not intended for production use.

pub mod mocks;

pub use mocks::{MockOAuthClient, MockTokenStore};
