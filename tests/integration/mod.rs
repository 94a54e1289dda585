//! Integration test suite for publish-status
//!
//! End-to-end tests of fetch cycles and the `pubstatus` binary. Endpoints
//! are replaced with in-memory transports from `test_utils`, so the suite
//! never touches the network.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **pipeline**: Full fetch cycles, resolution, partial failures
//! - **cli**: Command-line behavior of `walk`, `check` and `config`

// Shared test fixtures (from parent tests/ directory)
#[path = "../fixtures/mod.rs"]
mod fixtures;

mod cli;
mod pipeline;
