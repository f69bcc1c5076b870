//! # Node Runtime Library
//!
//! Exposes the runtime's modules for testing. The entry point is the
//! `main.rs` binary.
//!
//! - `config` - Command-line and environment configuration
//! - `recorder` - Typed entry recording under a commit policy
//! - `session` - The demonstration session run by the binary
//! - `export` - Writing the chain to disk as transfer records

#![warn(missing_docs)]

pub mod config;
pub mod export;
pub mod recorder;
pub mod session;

pub use config::NodeConfig;
pub use export::export_chain;
pub use recorder::{
    verify_document, CommitPolicy, DocumentVerification, LedgerRecorder, RecorderError,
};
pub use session::{run_demo_session, SessionReport};
