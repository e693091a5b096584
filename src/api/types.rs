//! Shared types for the HTTP layer.

use std::sync::Arc;

use crate::core_state::CoreState;

/// State handed to every handler.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}
