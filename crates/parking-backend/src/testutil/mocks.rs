//! Mock implementations for testing
//!
//! This module re-exports mock implementations from their respective modules
//! for convenient access in tests.

// Re-export HTTP mocks
pub use crate::api::http::mock::{MockHttpClient, RecordedRequest};

// Re-export token storage mocks
pub use crate::auth::store::mock::MemoryTokenStore;

// Re-export place search mocks
pub use crate::places::mock::StubPlaces;
