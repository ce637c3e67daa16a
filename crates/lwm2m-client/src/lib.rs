//! # LWM2M Client Bootstrap Support
//!
//! Device side of the bootstrap interface.
//!
//! ```text
//! Bootstrap Server ──Delete/Write/Discover──→ ObjectTreeAccessor
//!                  ──Finish──────────────────→ BootstrapHandler ──ConsistencyChecker
//!                                                    │
//! Registration engine ── try_init_session ───────────┤
//!                     ── wait_bootstrap_finished ←───┘ (after Finish ack is sent)
//!                     ── close_session
//! ```
//!
//! ## Crate Structure
//!
//! - `handler/` - Session flag and completion signal
//! - `domain/` - Consistency checks on the device objects
//! - `ports/` - Object tree access
//! - `adapters/` - In-memory object tree

pub mod adapters;
pub mod domain;
pub mod error;
pub mod handler;
pub mod ports;
pub mod settings;

pub use adapters::InMemoryObjectTree;
pub use domain::ConsistencyChecker;
pub use error::{ClientError, ClientResult, WaitError};
pub use handler::{BootstrapHandler, FinishCompletion, FinishReply};
pub use ports::ObjectTreeAccessor;
pub use settings::BootstrapHandlerSettings;
