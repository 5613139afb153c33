use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

use smol_str::SmolStr;
use weft_dom::{DomPosition, NodeId};

use crate::config::{EditorConfig, ModelToDomOptions};
use crate::format::defaults::{ImplicitFormat, default_implicit_format};
use crate::model::ListLevel;
use crate::selection::DomSelection;

/// Block elements a render added to or removed from the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteFromModel {
    pub added_block_elements: Vec<NodeId>,
    pub removed_block_elements: Vec<NodeId>,
}

/// A list element that later list items may continue.
#[derive(Debug, Clone)]
pub(crate) struct ListNode {
    pub node: NodeId,
    pub level: ListLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TableSelectionInfo {
    pub table: NodeId,
    pub first_row: usize,
    pub first_column: usize,
    pub last_row: usize,
    pub last_column: usize,
}

/// Selection being reconstructed while segments render.
#[derive(Debug, Clone, Default)]
pub(crate) struct SelectionState {
    pub start: Option<DomPosition>,
    pub end: Option<DomPosition>,
    /// Position right after the last rendered segment.
    pub current: Option<DomPosition>,
    pub image: Option<NodeId>,
    pub table: Option<TableSelectionInfo>,
}

impl SelectionState {
    /// Run `f` over the recorded range anchors and store the rebound values.
    pub fn with_anchors<R>(&mut self, f: impl FnOnce(&mut [DomPosition]) -> R) -> R {
        let slots = [&mut self.start, &mut self.end];
        let mut anchors: Vec<DomPosition> = slots.iter().filter_map(|slot| **slot).collect();
        let result = f(&mut anchors);
        let mut rebound = anchors.into_iter();
        for slot in slots {
            if slot.is_some() {
                *slot = rebound.next();
            }
        }
        result
    }

    /// Table cells win over an image, an image wins over a text range.
    pub fn to_dom_selection(&self) -> Option<DomSelection> {
        if let Some(table) = self.table {
            return Some(DomSelection::Table {
                table: table.table,
                first_row: table.first_row,
                first_column: table.first_column,
                last_row: table.last_row,
                last_column: table.last_column,
            });
        }
        if let Some(image) = self.image {
            return Some(DomSelection::Image { image });
        }
        let start = self.start?;
        Some(DomSelection::range(start, self.end.unwrap_or(start)))
    }
}

/// State threaded through Model→markup conversion.
///
/// The implicit format is the format the surrounding wrappers already
/// provide; appliers compare against it and skip values it covers. Change it
/// only through [`ModelToDomContext::stack_format`] or
/// [`ModelToDomContext::stack_implicit`], whose guards restore the previous
/// value when dropped.
pub struct ModelToDomContext<'a> {
    pub config: &'a EditorConfig,
    pub allow_cache_element: bool,
    implicit: ImplicitFormat,
    table_cell_padding: Option<SmolStr>,
    pub(crate) selection: SelectionState,
    pub(crate) list: Vec<ListNode>,
    /// List elements already placed by this render.
    pub(crate) claimed_lists: HashSet<NodeId>,
    /// Children taken out of reused list elements; those never put back
    /// are reported as removed.
    pub(crate) released_list_children: Vec<NodeId>,
    pub(crate) referenced_entities: HashSet<NodeId>,
    pub rewrite: RewriteFromModel,
    /// Images and entity wrappers placed by this render.
    pub new_nodes: Vec<NodeId>,
    /// Entity wrappers that were in the tree but no longer in the Model.
    pub deleted_entities: Vec<NodeId>,
}

impl<'a> ModelToDomContext<'a> {
    pub fn new(config: &'a EditorConfig) -> Self {
        Self {
            config,
            allow_cache_element: config
                .model_to_dom
                .contains(ModelToDomOptions::ALLOW_CACHE_ELEMENT),
            implicit: ImplicitFormat::default(),
            table_cell_padding: None,
            selection: SelectionState::default(),
            list: Vec::new(),
            claimed_lists: HashSet::new(),
            released_list_children: Vec::new(),
            referenced_entities: HashSet::new(),
            rewrite: RewriteFromModel::default(),
            new_nodes: Vec::new(),
            deleted_entities: Vec::new(),
        }
    }

    pub fn options(&self) -> ModelToDomOptions {
        self.config.model_to_dom
    }

    pub fn implicit_format(&self) -> &ImplicitFormat {
        &self.implicit
    }

    /// Uniform padding the enclosing table already declares for its cells.
    pub fn table_cell_padding(&self) -> Option<&SmolStr> {
        self.table_cell_padding.as_ref()
    }

    pub(crate) fn set_table_cell_padding(&mut self, padding: Option<SmolStr>) -> Option<SmolStr> {
        std::mem::replace(&mut self.table_cell_padding, padding)
    }

    /// Layer the format implied by a `tag` wrapper for the guard's lifetime.
    pub fn stack_format(&mut self, tag: &str) -> FormatScope<'_, 'a> {
        let implied = default_implicit_format(tag);
        self.stack_implicit(|implicit| implicit.merge_from(&implied))
    }

    /// Adjust the implicit format for the guard's lifetime.
    pub fn stack_implicit(&mut self, f: impl FnOnce(&mut ImplicitFormat)) -> FormatScope<'_, 'a> {
        let saved = self.implicit.clone();
        f(&mut self.implicit);
        FormatScope { ctx: self, saved }
    }
}

/// Restores the implicit format on drop, including during unwinding.
pub struct FormatScope<'s, 'a> {
    ctx: &'s mut ModelToDomContext<'a>,
    saved: ImplicitFormat,
}

impl<'a> Deref for FormatScope<'_, 'a> {
    type Target = ModelToDomContext<'a>;

    fn deref(&self) -> &Self::Target {
        &*self.ctx
    }
}

impl DerefMut for FormatScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.ctx
    }
}

impl Drop for FormatScope<'_, '_> {
    fn drop(&mut self) {
        self.ctx.implicit = std::mem::take(&mut self.saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatBag;

    #[test]
    fn test_format_scope_restores() {
        let config = EditorConfig::default();
        let mut ctx = ModelToDomContext::new(&config);
        {
            let mut outer = ctx.stack_format("h1");
            assert!(outer.implicit_format().segment.is_bold());
            {
                let inner = outer.stack_implicit(|i| i.segment.text_color = Some("red".into()));
                assert!(inner.implicit_format().segment.is_bold());
                assert_eq!(
                    inner.implicit_format().segment.text_color.as_deref(),
                    Some("red")
                );
            }
            assert_eq!(outer.implicit_format().segment.text_color, None);
        }
        assert!(ctx.implicit_format().segment.is_empty());
        assert!(ctx.implicit_format().block.is_empty());
    }

    #[test]
    fn test_selection_priority() {
        let mut dom = weft_dom::Dom::new();
        let text = dom.create_text("a");
        let img = dom.create_element("img");
        let mut state = SelectionState {
            start: Some(DomPosition::new(text, 0)),
            ..Default::default()
        };
        assert_eq!(
            state.to_dom_selection(),
            Some(DomSelection::caret(DomPosition::new(text, 0)))
        );
        state.image = Some(img);
        assert_eq!(state.to_dom_selection(), Some(DomSelection::Image { image: img }));
    }

    #[test]
    fn test_with_anchors_skips_unset_slots() {
        let mut dom = weft_dom::Dom::new();
        let text = dom.create_text("ab");
        let mut state = SelectionState {
            end: Some(DomPosition::new(text, 1)),
            ..Default::default()
        };
        state.with_anchors(|anchors| {
            assert_eq!(anchors.len(), 1);
            anchors[0].offset = 2;
        });
        assert_eq!(state.start, None);
        assert_eq!(state.end, Some(DomPosition::new(text, 2)));
    }
}
