//! Failure types captured at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The one failure kind the boundary deals in: a descendant's render logic
/// failed while the host framework evaluated the wrapped subtree.
///
/// The originating error is carried unchanged; the boundary never inspects
/// it beyond logging and handing it to fallback renderers.
#[derive(Debug, Error)]
#[error("subtree render failed: {source}")]
pub struct SubtreeFailure {
    /// The originating error.
    #[source]
    pub source: anyhow::Error,

    /// Where in the tree the failure surfaced, when the pathway reports it.
    /// Live render passes supply one; isolated pre-renders may not.
    pub trace: Option<ComponentTrace>,
}

impl SubtreeFailure {
    pub fn new(source: anyhow::Error) -> Self {
        Self {
            source,
            trace: None,
        }
    }

    pub fn with_trace(source: anyhow::Error, trace: ComponentTrace) -> Self {
        Self {
            source,
            trace: Some(trace),
        }
    }
}

/// Host-supplied diagnostic naming the component path a failure crossed,
/// outermost component first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentTrace {
    pub component_stack: Vec<String>,
}

impl ComponentTrace {
    pub fn new(component_stack: Vec<String>) -> Self {
        Self { component_stack }
    }
}

impl fmt::Display for ComponentTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.component_stack.join(" > "))
    }
}
