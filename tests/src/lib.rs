//! # LWM2M Bootstrap Test Suite
//!
//! Cross-crate flows between the bootstrap server and a simulated device.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── device.rs     # Loopback RequestSender driving the client handler
//!     ├── fixtures.rs   # Device trees and bootstrap configurations
//!     ├── flows.rs      # End-to-end sessions
//!     └── observability.rs  # Metrics exposition and logging setup
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lwm2m-tests
//! cargo test -p lwm2m-tests integration::flows::
//! ```

#![allow(dead_code)]

pub mod integration;
