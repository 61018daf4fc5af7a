//! Configuration for the loop service.

use serde::Deserialize;

/// Tunables for [`super::LoopService`].
///
/// # Examples
///
/// ```
/// use loopforge::lifecycle::services::LoopServiceConfig;
///
/// let config = LoopServiceConfig::default();
/// assert_eq!(config.default_list_limit, 100);
/// assert!(config.catch_hook_panics);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoopServiceConfig {
    /// Limit applied by `list_by_state` when the caller gives none.
    pub default_list_limit: usize,
    /// Whether a panicking hook is contained like a hook returning an error.
    ///
    /// When `false`, the panic unwinds through `transition` after the record
    /// has already been saved.
    pub catch_hook_panics: bool,
}

impl Default for LoopServiceConfig {
    fn default() -> Self {
        Self {
            default_list_limit: 100,
            catch_hook_panics: true,
        }
    }
}
