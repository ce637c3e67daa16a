//! Domain module for the device side
//!
//! ## Modules
//! - checker: consistency of the device's objects after bootstrap

pub mod checker;

pub use checker::ConsistencyChecker;
