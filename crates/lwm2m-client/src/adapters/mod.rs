//! Adapters module for the device side

pub mod object_tree;

pub use object_tree::InMemoryObjectTree;
