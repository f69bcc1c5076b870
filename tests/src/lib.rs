//! # GovChain Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # Cross-crate flows
//! │   ├── flows.rs       # records -> recorder -> service -> archive -> verifier
//! │   └── custody.rs     # tamper detection on archived chains
//! └── benches/           # Hashing, mining and validation throughput
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p gc-tests
//! cargo test -p gc-tests integration::custody
//! cargo bench -p gc-tests
//! ```

pub mod integration;
