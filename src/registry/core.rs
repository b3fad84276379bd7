use std::collections::{BTreeMap, BTreeSet};

use blake3::Hash;
use serde::Serialize;

use crate::controller::PositioningMode;
use crate::layout::LayoutResult;

/// Element whose inline layout styles are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleTarget {
    Container,
    Item(usize),
}

/// Layout-owned inline declarations of one element. `None` means cleared.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StyleDecl {
    pub width: Option<f64>,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub height: Option<f64>,
    pub position: Option<&'static str>,
}

impl StyleDecl {
    pub fn is_cleared(&self) -> bool {
        *self == Self::default()
    }

    fn fingerprint(&self) -> Hash {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&bytes)
    }
}

#[derive(Debug, Clone)]
pub struct StyleState {
    pub decl: StyleDecl,
    hash: Hash,
}

impl StyleState {
    fn new(decl: StyleDecl) -> Self {
        let hash = decl.fingerprint();
        Self { decl, hash }
    }
}

/// Last applied styles per element, so sinks only rewrite what changed.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    entries: BTreeMap<StyleTarget, StyleState>,
    dirty: BTreeSet<StyleTarget>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a pass result into declarations and flag the ones that differ.
    ///
    /// `item_count` bounds the items touched by a reset, which carries no
    /// placements of its own.
    pub fn sync(&mut self, result: &LayoutResult, mode: PositioningMode, item_count: usize) {
        let absolute = matches!(mode, PositioningMode::Absolute);

        match result {
            LayoutResult::Reset => {
                self.update(StyleTarget::Container, StyleDecl::default());
                for index in 0..item_count {
                    self.update(StyleTarget::Item(index), StyleDecl::default());
                }
                self.retain_items(item_count);
            }
            LayoutResult::Placed {
                items,
                container_height,
            } => {
                self.update(
                    StyleTarget::Container,
                    StyleDecl {
                        height: Some(*container_height),
                        position: absolute.then_some("relative"),
                        ..StyleDecl::default()
                    },
                );
                for (index, placement) in items.iter().enumerate() {
                    self.update(
                        StyleTarget::Item(index),
                        StyleDecl {
                            width: Some(placement.width),
                            left: Some(placement.left),
                            top: Some(placement.top),
                            height: None,
                            position: absolute.then_some("absolute"),
                        },
                    );
                }
                self.retain_items(items.len());
            }
        }
    }

    fn update(&mut self, target: StyleTarget, decl: StyleDecl) {
        let next = StyleState::new(decl);
        let changed = match self.entries.get(&target) {
            Some(state) => state.hash != next.hash,
            // Untracked elements carry no overrides yet.
            None => !next.decl.is_cleared(),
        };
        if changed {
            self.dirty.insert(target);
        }
        self.entries.insert(target, next);
    }

    fn retain_items(&mut self, item_count: usize) {
        self.entries.retain(|target, _| match target {
            StyleTarget::Item(index) => *index < item_count,
            StyleTarget::Container => true,
        });
        self.dirty.retain(|target| match target {
            StyleTarget::Item(index) => *index < item_count,
            StyleTarget::Container => true,
        });
    }

    pub fn take_dirty(&mut self) -> Vec<(StyleTarget, StyleDecl)> {
        let targets = std::mem::take(&mut self.dirty);
        targets
            .into_iter()
            .filter_map(|target| {
                self.entries
                    .get(&target)
                    .map(|state| (target, state.decl.clone()))
            })
            .collect()
    }

    pub fn style_of(&self, target: StyleTarget) -> Option<&StyleDecl> {
        self.entries.get(&target).map(|state| &state.decl)
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }
}
