//! Ports module for the device side

pub mod outbound;

pub use outbound::ObjectTreeAccessor;
