//! # Consistency Pipeline
//!
//! Ordered list of independent checks over an [`ObjectTree`]. Checks are
//! grouped in stages; a stage only runs when every earlier stage passed, and
//! all violations of the failing stage are reported together.
//!
//! ```text
//! [Structural] ──ok──→ [Device] ──ok──→ [Semantic]
//!      │                   │                 │
//!      └── violations ─────┴── violations ───┴── violations ──→ Some(list)
//! ```
//!
//! A check that panics is reported as a violation of its stage instead of
//! unwinding into the caller.

use crate::credentials::check_server_info;
use lwm2m_types::ids::{DEVICE, DEV_SUPPORTED_BINDING, SECURITY, SERVER};
use lwm2m_types::{ids, BindingModes, ObjectTree, ServerInfo, ServersInfoExtractor};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Mandatory objects are present.
    Structural,
    /// The Device object is usable.
    Device,
    /// Every inferred server record is well formed.
    Semantic,
}

const STAGES: [Stage; 3] = [Stage::Structural, Stage::Device, Stage::Semantic];

/// A check over the whole tree.
pub type TreeCheck = Box<dyn Fn(&ObjectTree) -> Vec<String> + Send + Sync>;

/// A check over a single extracted server record.
pub type ServerCheck = Box<dyn Fn(&ServerInfo) -> Vec<String> + Send + Sync>;

/// Composable, side-effect-free tree validation.
#[derive(Default)]
pub struct ConsistencyPipeline {
    checks: Vec<(Stage, TreeCheck)>,
    extractor: Option<Arc<dyn ServersInfoExtractor>>,
    server_checks: Vec<ServerCheck>,
}

impl ConsistencyPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mandatory objects, Device record, then certificate usage and OSCORE
    /// checks on every server record produced by `extractor`.
    pub fn standard(extractor: Arc<dyn ServersInfoExtractor>) -> Self {
        Self::new()
            .with_check(Stage::Structural, mandatory_objects)
            .with_check(Stage::Device, device_record)
            .with_extractor(extractor)
            .with_server_check(check_server_info)
    }

    pub fn with_check<F>(mut self, stage: Stage, check: F) -> Self
    where
        F: Fn(&ObjectTree) -> Vec<String> + Send + Sync + 'static,
    {
        self.checks.push((stage, Box::new(check)));
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn ServersInfoExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Per-server check, run in the semantic stage after extraction.
    pub fn with_server_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&ServerInfo) -> Vec<String> + Send + Sync + 'static,
    {
        self.server_checks.push(Box::new(check));
        self
    }

    /// `None` when consistent, otherwise every violation of the first
    /// failing stage.
    pub fn run(&self, tree: &ObjectTree) -> Option<Vec<String>> {
        for stage in STAGES {
            let mut violations = Vec::new();
            for (_, check) in self.checks.iter().filter(|(s, _)| *s == stage) {
                violations.extend(guarded(stage, || check(tree)));
            }
            if stage == Stage::Semantic {
                violations.extend(guarded(stage, || self.check_servers(tree)));
            }
            if !violations.is_empty() {
                return Some(violations);
            }
        }
        None
    }

    fn check_servers(&self, tree: &ObjectTree) -> Vec<String> {
        let Some(extractor) = &self.extractor else {
            return Vec::new();
        };
        match extractor.extract(tree) {
            Err(e) => vec![format!("Unable to extract server information: {e}")],
            Ok(None) => Vec::new(),
            Ok(Some(servers)) => servers
                .all()
                .flat_map(|info| self.server_checks.iter().flat_map(move |check| check(info)))
                .collect(),
        }
    }
}

fn guarded<F>(stage: Stage, check: F) -> Vec<String>
where
    F: FnOnce() -> Vec<String>,
{
    catch_unwind(AssertUnwindSafe(check)).unwrap_or_else(|panic| {
        let reason = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        warn!(?stage, %reason, "consistency check failed unexpectedly");
        vec![format!("Unexpected error during {stage:?} check: {reason}")]
    })
}

/// Security, Server and Device objects must be enabled.
pub fn mandatory_objects(tree: &ObjectTree) -> Vec<String> {
    [SECURITY, SERVER, DEVICE]
        .into_iter()
        .filter(|id| !tree.has_object(*id))
        .map(|id| format!("{} object ({id}) is mandatory", ids::object_name(id)))
        .collect()
}

/// Exactly one Device instance with parseable supported binding modes.
pub fn device_record(tree: &ObjectTree) -> Vec<String> {
    let count = tree.instance_count(DEVICE);
    if count != 1 {
        return vec![format!(
            "Device object (3) must have exactly one instance, found {count}"
        )];
    }
    let Some(device) = tree.instances(DEVICE).next() else {
        return Vec::new();
    };

    match device.optional_string(DEV_SUPPORTED_BINDING) {
        Ok(None) => vec![format!(
            "Device object (3) must provide supported binding modes (/3/{}/16)",
            device.id
        )],
        Err(e) => vec![format!("Device object (3) supported binding modes: {e}")],
        Ok(Some(value)) => match value.parse::<BindingModes>() {
            Ok(_) => Vec::new(),
            Err(e) => vec![format!("Device object (3) supported binding modes: {e}")],
        },
    }
}
