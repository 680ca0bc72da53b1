use std::sync::Arc;
use std::time::Duration;

use crate::collab::{BusyProbe, ConfirmPrompt, ConfirmRequest, DirtyMap};
use crate::config::{BusyCheckPolicy, EngineSettings};
use crate::error::ProbeError;
use crate::pane::Tab;

use super::CloseStage;

/// Outcome of running the gates for one or more tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateVerdict {
    /// Every gate passed.
    Proceed {
        /// Paths whose unsaved changes the user agreed to discard
        discarded: Vec<String>,
    },
    /// A gate was declined.
    Cancelled(CloseStage),
}

/// Runs the busy and dirty gates in front of a close.
///
/// Gates run one tab at a time and one question at a time. The first
/// declined question ends the pipeline.
#[derive(Clone)]
pub struct CloseOrchestrator {
    confirm: Arc<dyn ConfirmPrompt>,
    busy_probe: Option<Arc<dyn BusyProbe>>,
    busy_timeout: Duration,
    policy: BusyCheckPolicy,
}

impl std::fmt::Debug for CloseOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloseOrchestrator")
            .field("has_busy_probe", &self.busy_probe.is_some())
            .field("busy_timeout", &self.busy_timeout)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl CloseOrchestrator {
    /// Creates an orchestrator with no busy probe and default settings.
    #[must_use]
    pub fn new(confirm: Arc<dyn ConfirmPrompt>) -> Self {
        let settings = EngineSettings::default();
        Self {
            confirm,
            busy_probe: None,
            busy_timeout: settings.busy_check_timeout(),
            policy: settings.busy_check_policy,
        }
    }

    /// Sets the busy probe consulted for terminal tabs
    #[must_use]
    pub fn with_busy_probe(mut self, probe: Arc<dyn BusyProbe>) -> Self {
        self.busy_probe = Some(probe);
        self
    }

    /// Sets the busy probe timeout
    #[must_use]
    pub const fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets how probe errors and timeouts are read
    #[must_use]
    pub const fn with_policy(mut self, policy: BusyCheckPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Applies the timeout and policy from `settings`
    #[must_use]
    pub const fn with_settings(self, settings: &EngineSettings) -> Self {
        self.with_busy_timeout(settings.busy_check_timeout())
            .with_policy(settings.busy_check_policy)
    }

    /// Runs both gates for one tab.
    pub async fn gate(&self, tab: &Tab, dirty: &DirtyMap) -> GateVerdict {
        self.gate_all(std::slice::from_ref(tab), dirty).await
    }

    /// Runs both gates for each tab in order.
    pub async fn gate_all(&self, tabs: &[Tab], dirty: &DirtyMap) -> GateVerdict {
        let mut discarded = Vec::new();
        for tab in tabs {
            tracing::trace!(tab_id = %tab.id, stage = %CloseStage::Requested, "Close gate");

            if !self.pass_busy_gate(tab).await {
                tracing::debug!(
                    tab_id = %tab.id,
                    stage = %CloseStage::BusyCheck,
                    "Close cancelled"
                );
                return GateVerdict::Cancelled(CloseStage::BusyCheck);
            }

            if dirty.is_dirty(&tab.path) {
                let request = ConfirmRequest::DiscardChanges {
                    tab_id: tab.id.clone(),
                    path: tab.path.clone(),
                    label: tab.label.clone(),
                };
                if !self.confirm.confirm(&request).await {
                    tracing::debug!(
                        tab_id = %tab.id,
                        stage = %CloseStage::DirtyCheck,
                        "Close cancelled"
                    );
                    return GateVerdict::Cancelled(CloseStage::DirtyCheck);
                }
                discarded.push(tab.path.clone());
            }
        }
        tracing::trace!(tabs = tabs.len(), stage = %CloseStage::Confirmed, "Close gate");
        GateVerdict::Proceed { discarded }
    }

    /// Returns false if the tab is busy and the user declined to close it.
    async fn pass_busy_gate(&self, tab: &Tab) -> bool {
        if !tab.view_type.is_terminal() {
            return true;
        }
        if !self.is_busy(tab).await {
            return true;
        }
        let request = ConfirmRequest::CloseBusy {
            tab_id: tab.id.clone(),
            label: tab.label.clone(),
        };
        self.confirm.confirm(&request).await
    }

    async fn is_busy(&self, tab: &Tab) -> bool {
        let Some(probe) = &self.busy_probe else {
            return false;
        };
        let answer = match tokio::time::timeout(self.busy_timeout, probe.is_busy(&tab.id)).await {
            Ok(answer) => answer,
            Err(_) => Err(ProbeError::TimedOut(self.busy_timeout)),
        };
        match answer {
            Ok(busy) => busy,
            Err(e) => {
                let busy = self.policy.assume_busy();
                tracing::warn!(
                    tab_id = %tab.id,
                    error = %e,
                    assume_busy = busy,
                    "Busy probe failed"
                );
                busy
            }
        }
    }
}
