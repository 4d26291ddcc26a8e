//! Process-wide default resize backend, used whenever a transform is configured
//! without an explicit backend.
use std::sync::RwLock;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::types::Backend;

/// Environment variable read once to seed the default backend.
pub const BACKEND_ENV_VAR: &str = "SRPAIR_RESIZE_BACKEND";

static DEFAULT_BACKEND: Lazy<RwLock<Backend>> = Lazy::new(|| RwLock::new(initial_backend()));

fn initial_backend() -> Backend {
    match std::env::var(BACKEND_ENV_VAR) {
        Ok(name) => match name.parse::<Backend>() {
            Ok(backend) => {
                debug!("Default resize backend from {}: {}", BACKEND_ENV_VAR, backend);
                backend
            }
            Err(_) => {
                warn!(
                    "Ignoring {}={:?}; expected 'fir' or 'image'",
                    BACKEND_ENV_VAR, name
                );
                Backend::Fir
            }
        },
        Err(_) => Backend::Fir,
    }
}

pub fn default_backend() -> Backend {
    *DEFAULT_BACKEND
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Replaces the default backend for every later call that does not name one.
pub fn set_default_backend(backend: Backend) {
    let mut guard = DEFAULT_BACKEND
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = backend;
}

/// Picks `backend` if given, else the process-wide default.
pub fn resolve_backend(backend: Option<Backend>) -> Backend {
    backend.unwrap_or_else(default_backend)
}
