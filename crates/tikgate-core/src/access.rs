// ── Authorization gate ──

use std::collections::BTreeSet;

use crate::config::{AccessConfig, EmptyAdminPolicy};
use crate::error::CoreError;

/// Classifies callers as privileged or not against a static allow-list.
#[derive(Debug, Clone)]
pub struct AccessGate {
    admin_ids: BTreeSet<i64>,
    empty_policy: EmptyAdminPolicy,
}

impl AccessGate {
    pub fn new(config: &AccessConfig) -> Self {
        Self {
            admin_ids: config.admin_ids.clone(),
            empty_policy: config.empty_policy,
        }
    }

    /// With an empty allow-list the pinned policy applies to every caller.
    pub fn is_admin(&self, caller_id: i64) -> bool {
        if self.admin_ids.is_empty() {
            return self.empty_policy == EmptyAdminPolicy::Everyone;
        }
        self.admin_ids.contains(&caller_id)
    }

    pub fn require_admin(&self, caller_id: i64) -> Result<(), CoreError> {
        if self.is_admin(caller_id) {
            Ok(())
        } else {
            Err(CoreError::Authorization)
        }
    }
}
