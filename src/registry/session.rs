//! Process-wide registry for callers that want init/teardown semantics
//! instead of owning a [`SourceRegistry`] value.

use once_cell::sync::Lazy;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::error;

use super::SourceRegistry;
use crate::config::Config;
use crate::error::RegistryError;
use crate::types::SourceEntry;

static SESSION: Lazy<RwLock<Option<Arc<SourceRegistry>>>> = Lazy::new(|| RwLock::new(None));

/// Build the global registry. Returns the number of diagnostics recorded.
pub fn init<I>(entries: I, config: &Config) -> Result<usize, RegistryError>
where
    I: IntoIterator<Item = SourceEntry>,
{
    let mut session = SESSION.write().unwrap_or_else(PoisonError::into_inner);
    if session.is_some() {
        return Err(RegistryError::AlreadyInitialized);
    }

    let registry = SourceRegistry::build(entries, config)?;
    let errors = registry.error_count();
    if errors > 0 {
        error!(errors, "dependency errors detected");
    }
    *session = Some(Arc::new(registry));
    Ok(errors)
}

/// The current registry, if one is initialized.
pub fn current() -> Option<Arc<SourceRegistry>> {
    SESSION
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Drop the global registry. Handles already returned by [`current`] stay valid.
pub fn exit() -> bool {
    SESSION
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only test touching the global; the steps must run in this order.
    #[test]
    fn test_session_lifecycle() {
        assert!(current().is_none());
        assert!(!exit());

        let entries = vec![
            SourceEntry::new("a.glsl", "a.glsl", "#pragma BLENDER_REQUIRE(b.glsl)\n"),
            SourceEntry::new("b.glsl", "b.glsl", "gl_VertexID\n"),
        ];
        assert_eq!(init(entries, &Config::default()).unwrap(), 0);
        assert_eq!(
            init(Vec::new(), &Config::default()),
            Err(RegistryError::AlreadyInitialized)
        );

        let registry = current().unwrap();
        assert_eq!(registry.len(), 2);

        assert!(exit());
        assert!(current().is_none());
        // The handle outlives teardown.
        assert_eq!(registry.dependency_names("a.glsl").unwrap(), vec!["b.glsl"]);

        let broken = vec![SourceEntry::new("c.glsl", "c.glsl", "#pragma BLENDER_REQUIRE(x.glsl)\n")];
        assert_eq!(init(broken, &Config::default()).unwrap(), 1);
        assert!(exit());
    }
}
