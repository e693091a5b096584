//! Process-wide application state.
//!
//! Built once at startup from `AppConfig` and shared read-only (behind an
//! `Arc`) by every request. Nothing in here is mutated after construction.

use crate::config::AppConfig;
use crate::pipeline::llm::{LlmError, ModelGateway};
use crate::pipeline::rag::ContextBuilder;
use crate::pipeline::LegalOrchestrator;
use crate::reminders::ReminderStore;
use crate::vault::{Vault, VaultError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Model gateway setup failed: {0}")]
    Gateway(#[from] LlmError),
    #[error("Vault setup failed: {0}")]
    Vault(#[from] VaultError),
}

pub struct CoreState {
    pub config: AppConfig,
    orchestrator: LegalOrchestrator,
    vault: Vault,
    /// `None` when the reminder database could not be opened at startup.
    reminders: Option<ReminderStore>,
}

impl CoreState {
    pub fn new(
        config: AppConfig,
        orchestrator: LegalOrchestrator,
        vault: Vault,
        reminders: Option<ReminderStore>,
    ) -> Self {
        Self {
            config,
            orchestrator,
            vault,
            reminders,
        }
    }

    /// Resolve every optional capability once: retrieval, cloud vault,
    /// reminder store. Missing ones are logged and degraded, not fatal.
    pub fn from_config(config: AppConfig) -> Result<Self, CoreError> {
        let gateway = ModelGateway::from_settings(&config.llm)?;
        let context = ContextBuilder::from_settings(&config.rag);
        let orchestrator = LegalOrchestrator::new(gateway, context, config.context_cap);

        let vault = Vault::from_config(&config)?;

        let reminders = match ReminderStore::open(&config.db_path) {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::warn!(
                    path = %config.db_path.display(),
                    error = %e,
                    "Reminder store not connected"
                );
                None
            }
        };

        tracing::info!(
            retrieval = orchestrator.retrieval_strategy(),
            cloud_vault = vault.has_cloud(),
            reminders = reminders.is_some(),
            "Core state ready"
        );

        Ok(Self::new(config, orchestrator, vault, reminders))
    }

    pub fn orchestrator(&self) -> &LegalOrchestrator {
        &self.orchestrator
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    pub fn reminders(&self) -> Option<&ReminderStore> {
        self.reminders.as_ref()
    }
}
