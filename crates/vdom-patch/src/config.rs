use serde::{Deserialize, Serialize};

/// Which reconciliation heuristics to apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffMode {
    /// Full prop set difference; keys and tags must match to patch in place.
    #[default]
    Exact,
    /// The historical heuristics: key-count branch selection, early exit
    /// after the first shared prop, and same-key elements left untouched.
    Compat,
}

/// Configuration for a [`Reconciler`](crate::Reconciler).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    pub mode: DiffMode,
    /// Also refresh the vnode cache when the caller passes an explicit
    /// previous vnode. Off by default: the cache is only written when the
    /// caller relies on it.
    pub cache_explicit_prev: bool,
}

impl PatchConfig {
    /// Behave exactly like the historical implementation.
    pub fn compat() -> Self {
        Self {
            mode: DiffMode::Compat,
            ..Default::default()
        }
    }
}
