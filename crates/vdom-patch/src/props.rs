//! Prop diff: bring one host element's properties in line with a new prop map.

use tracing::trace;
use vdom_host::{HostTree, NodeId};
use vdom_types::Props;

use crate::config::DiffMode;
use crate::error::PatchResult;

/// Patch the properties of `el` from `old` to `new`.
///
/// Absent maps are treated as empty; if both are absent nothing happens.
/// When the old map has more keys than the new one the pass is
/// deletion-dominant and walks the old keys first, otherwise it walks the
/// new keys first.
///
/// In [`DiffMode::Exact`] both walks run to completion: stale props are
/// deleted (property and attribute), new or changed props are assigned.
/// In [`DiffMode::Compat`] only the selected walk runs and it stops at the
/// first key the two maps share.
pub fn patch_props(
    host: &mut dyn HostTree,
    el: NodeId,
    old: Option<&Props>,
    new: Option<&Props>,
    mode: DiffMode,
) -> PatchResult<()> {
    if old.is_none() && new.is_none() {
        return Ok(());
    }
    let empty = Props::new();
    let old = old.unwrap_or(&empty);
    let new = new.unwrap_or(&empty);
    let deletion_dominant = old.len() > new.len();

    trace!(%el, old = old.len(), new = new.len(), deletion_dominant, ?mode, "patching props");

    match (mode, deletion_dominant) {
        (DiffMode::Exact, true) => {
            remove_stale(host, el, old, new)?;
            assign_changed(host, el, old, new)
        }
        (DiffMode::Exact, false) => {
            assign_changed(host, el, old, new)?;
            remove_stale(host, el, old, new)
        }
        (DiffMode::Compat, true) => compat_deletion(host, el, old, new),
        (DiffMode::Compat, false) => compat_addition(host, el, old, new),
    }
}

fn remove_stale(host: &mut dyn HostTree, el: NodeId, old: &Props, new: &Props) -> PatchResult<()> {
    for name in old.keys().filter(|name| !new.contains_key(*name)) {
        host.delete_property(el, name)?;
        host.remove_attribute(el, name)?;
    }
    Ok(())
}

fn assign_changed(
    host: &mut dyn HostTree,
    el: NodeId,
    old: &Props,
    new: &Props,
) -> PatchResult<()> {
    for (name, value) in new {
        if old.get(name) != Some(value) {
            host.set_property(el, name, value)?;
        }
    }
    Ok(())
}

fn compat_deletion(
    host: &mut dyn HostTree,
    el: NodeId,
    old: &Props,
    new: &Props,
) -> PatchResult<()> {
    for (name, old_value) in old {
        match new.get(name) {
            Some(new_value) if new_value.is_truthy() => {
                if new_value != old_value {
                    host.set_property(el, name, new_value)?;
                }
                return Ok(());
            }
            _ => {
                host.delete_property(el, name)?;
                host.remove_attribute(el, name)?;
            }
        }
    }
    Ok(())
}

fn compat_addition(
    host: &mut dyn HostTree,
    el: NodeId,
    old: &Props,
    new: &Props,
) -> PatchResult<()> {
    for (name, new_value) in new {
        match old.get(name) {
            // The historical check compares the old value with itself, so a
            // shared key is never reassigned; the walk just ends here.
            Some(old_value) if old_value.is_truthy() => return Ok(()),
            _ => host.set_property(el, name, new_value)?,
        }
    }
    Ok(())
}
