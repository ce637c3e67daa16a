//! # Integration Tests
//!
//! The bootstrap server talks to an in-process device: every downlink
//! request goes through the device's bootstrap handler and object tree
//! instead of a CoAP transport.

pub mod device;
pub mod fixtures;

mod flows;
mod observability;
