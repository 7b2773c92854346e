//! Run mode and deployment capabilities
//!
//! Both are plain values built once by the caller and handed to the planner,
//! executor and activation; nothing here reads the environment.

use serde::{Deserialize, Serialize};

/// How far an activation goes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMode {
    /// Render transactions as commands instead of applying them
    pub dry_run: bool,
    /// Stop after the conflict gate, before removals and execution
    pub check_only: bool,
}

impl RunMode {
    /// Plan and apply
    pub fn apply() -> Self {
        Self::default()
    }

    /// Plan and print commands without touching the filesystem
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Run the forward pass and conflict gate only
    pub fn check_only() -> Self {
        Self {
            check_only: true,
            ..Self::default()
        }
    }
}

/// Which placement kinds the deployment supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Whether `copy` entries can be placed, overwritten and removed
    pub supports_copy: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            supports_copy: true,
        }
    }
}

impl Capabilities {
    /// Symlinks only: every regular-file collision is a conflict
    pub fn link_only() -> Self {
        Self {
            supports_copy: false,
        }
    }
}
