//! The process-wide embedder.
//!
//! Model-backed embedders are expensive to construct, so every index build and
//! query in a process goes through one shared instance. It is created on first
//! use; a different embedder can be installed only before that.

use std::sync::{Arc, OnceLock};

use campusbuddy_core::embedding::Embedder;
use tracing::debug;

use crate::embedder::HashingEmbedder;

static SHARED: OnceLock<Arc<dyn Embedder>> = OnceLock::new();

/// The shared embedder, initializing it with the default [`HashingEmbedder`]
/// if nothing was installed.
pub fn shared_embedder() -> Arc<dyn Embedder> {
    Arc::clone(SHARED.get_or_init(|| {
        debug!("Initializing default shared embedder");
        Arc::new(HashingEmbedder::default())
    }))
}

/// Install `embedder` as the shared instance.
///
/// Returns the rejected embedder if one was already installed or created.
pub fn install_shared_embedder(embedder: Arc<dyn Embedder>) -> Result<(), Arc<dyn Embedder>> {
    let name = embedder.name().to_string();
    SHARED.set(embedder)?;
    debug!(embedder = %name, "Installed shared embedder");
    Ok(())
}
