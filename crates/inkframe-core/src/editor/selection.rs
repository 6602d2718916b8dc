//! Part selection: which parts of a selected element are sub-selected.

use super::flags::EditorFlags;
use super::part::PartId;
use super::tree::EditorTree;
use super::EditorId;
use crate::error::EditorResult;
use crate::scene::SceneGraph;

/// Compute the selection that results from applying `ids` to `current`.
///
/// Overwrite mode (or no current selection) copies `ids`. Toggle mode keeps
/// the current ids not in `ids`, then appends the ids not yet selected.
/// An empty result is `None`.
pub fn merge_part_selection<F>(
    current: Option<&[PartId]>,
    toggle: bool,
    ids: &[PartId],
    eq: F,
) -> Option<Vec<PartId>>
where
    F: Fn(&PartId, &PartId) -> bool,
{
    let mut next: Vec<PartId> = Vec::with_capacity(ids.len());
    match current {
        Some(current) if toggle && !current.is_empty() => {
            for id in current {
                if !ids.iter().any(|other| eq(other, id)) {
                    next.push(id.clone());
                }
            }
            for id in ids {
                let known = current.iter().chain(next.iter()).any(|other| eq(other, id));
                if !known {
                    next.push(id.clone());
                }
            }
        }
        _ => {
            for id in ids {
                if !next.iter().any(|other| eq(other, id)) {
                    next.push(id.clone());
                }
            }
        }
    }
    (!next.is_empty()).then_some(next)
}

/// Order-insensitive comparison of two selections.
pub fn same_part_selection<F>(a: Option<&[PartId]>, b: Option<&[PartId]>, eq: F) -> bool
where
    F: Fn(&PartId, &PartId) -> bool,
{
    let (a, b) = (a.unwrap_or(&[]), b.unwrap_or(&[]));
    a.len() == b.len()
        && a.iter().all(|x| b.iter().any(|y| eq(x, y)))
        && b.iter().all(|y| a.iter().any(|x| eq(x, y)))
}

impl EditorTree {
    /// Check if a part of a node is selected.
    pub fn is_part_selected(&self, id: EditorId, part: &PartId) -> bool {
        self.node(id).is_some_and(|node| node.is_part_selected(part))
    }

    /// Merge `ids` into the node's part selection.
    ///
    /// Does nothing unless the node is selected. Returns true if the
    /// selection changed, in which case the change is bracketed by two
    /// invalidations.
    pub fn update_part_selection(
        &mut self,
        scene: &SceneGraph,
        id: EditorId,
        toggle: bool,
        ids: &[PartId],
    ) -> EditorResult<bool> {
        let next = {
            let node = self.get(id)?;
            if !node.flags.contains(EditorFlags::SELECTED) {
                return Ok(false);
            }
            let eq = |a: &PartId, b: &PartId| node.editor.parts_equal(a, b);
            let current = node.part_selection.as_deref();
            let next = merge_part_selection(current, toggle, ids, eq);
            if same_part_selection(current, next.as_deref(), eq) {
                return Ok(false);
            }
            next
        };

        self.invalidate(scene, id);
        self.get_mut(id)?.part_selection = next;
        self.invalidate(scene, id);
        Ok(true)
    }
}
