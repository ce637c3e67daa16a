//! # Consistency Checker
//!
//! Decides whether the objects of a device describe a usable set of
//! servers: mandatory objects present, one Device instance with binding
//! modes, and every inferred server record well formed. Used when the
//! device starts and when a bootstrap server finishes a session.

use crate::ports::ObjectTreeAccessor;
use lwm2m_security::ConsistencyPipeline;
use lwm2m_types::{DefaultServersInfoExtractor, ObjectTree, ServersInfoExtractor};
use std::sync::Arc;
use tracing::debug;

pub struct ConsistencyChecker {
    pipeline: ConsistencyPipeline,
}

impl Default for ConsistencyChecker {
    fn default() -> Self {
        Self::new(Arc::new(DefaultServersInfoExtractor))
    }
}

impl ConsistencyChecker {
    pub fn new(extractor: Arc<dyn ServersInfoExtractor>) -> Self {
        Self {
            pipeline: ConsistencyPipeline::standard(extractor),
        }
    }

    /// Replace the pipeline, e.g. to add device-specific checks.
    pub fn with_pipeline(pipeline: ConsistencyPipeline) -> Self {
        Self { pipeline }
    }

    /// `None` when consistent, otherwise every violation found.
    pub fn check_config(&self, tree: &ObjectTree) -> Option<Vec<String>> {
        let violations = self.pipeline.run(tree)?;
        debug!(count = violations.len(), "Device configuration is inconsistent");
        Some(violations)
    }

    pub fn check(&self, objects: &dyn ObjectTreeAccessor) -> Option<Vec<String>> {
        self.check_config(&objects.snapshot())
    }
}
