//! Model→markup conversion.
//!
//! Blocks render in order into their parent element, threading a reference
//! node: each handler places its element before the reference (or reuses
//! the element cached on the Model node, removing stale siblings up to it)
//! and returns the next reference. Whatever is left after the last block is
//! stale and removed, except entity wrappers and their delimiters, which are
//! reconciled once the whole tree is rendered.

mod block;
mod context;
mod list;
mod paragraph;
mod segment;
mod table;

use std::collections::BTreeMap;
use std::fmt;

use weft_dom::{Dom, DomError, NodeId};

pub use context::{FormatScope, ModelToDomContext, RewriteFromModel};
pub use paragraph::render_segment;

use crate::config::ModelToDomOptions;
use crate::entity::{DelimiterSide, delimiter_side, find_entity_wrappers, is_delimiter, is_entity_like};
use crate::error::RenderError;
use crate::format::FormatBag;
use crate::format::defaults::is_block_tag;
use crate::model::{Block, BlockGroupNode, BlockKind, ContentModelDocument, Segment, SegmentKindTag};
use crate::optimize::{merge_adjacent_text, strip_redundant_format};
use crate::selection::DomSelection;

/// Renders one block under `parent` before the reference node and returns
/// the next reference node.
pub type BlockHandler = fn(
    &mut Dom,
    NodeId,
    &mut Block,
    &mut ModelToDomContext<'_>,
    Option<NodeId>,
) -> Result<Option<NodeId>, RenderError>;

/// Appends one segment to a paragraph's content element.
pub type SegmentHandler =
    fn(&mut Dom, NodeId, &mut Segment, &mut ModelToDomContext<'_>) -> Result<(), RenderError>;

/// Handlers keyed by block and segment kind.
#[derive(Clone)]
pub struct ModelHandlerMap {
    blocks: BTreeMap<BlockKind, BlockHandler>,
    segments: BTreeMap<SegmentKindTag, SegmentHandler>,
}

impl fmt::Debug for ModelHandlerMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandlerMap")
            .field("blocks", &self.blocks.keys().collect::<Vec<_>>())
            .field("segments", &self.segments.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ModelHandlerMap {
    fn default() -> Self {
        let mut map = Self {
            blocks: BTreeMap::new(),
            segments: BTreeMap::new(),
        };
        map.set_block(BlockKind::Paragraph, paragraph::handle_paragraph);
        map.set_block(BlockKind::Table, table::handle_table);
        map.set_block(BlockKind::Divider, block::handle_divider);
        map.set_block(BlockKind::Entity, block::handle_entity_block);
        map.set_block(BlockKind::General, block::handle_general_block);
        map.set_block(BlockKind::FormatContainer, block::handle_format_container);
        map.set_block(BlockKind::ListItem, list::handle_list_item);

        map.set_segment(SegmentKindTag::Text, segment::handle_text);
        map.set_segment(SegmentKindTag::Br, segment::handle_br);
        map.set_segment(SegmentKindTag::Image, segment::handle_image);
        map.set_segment(SegmentKindTag::General, segment::handle_general);
        map.set_segment(SegmentKindTag::Entity, segment::handle_entity);
        map.set_segment(SegmentKindTag::SelectionMarker, segment::handle_marker);
        map
    }
}

impl ModelHandlerMap {
    pub fn block(&self, kind: BlockKind) -> Option<BlockHandler> {
        self.blocks.get(&kind).copied()
    }

    /// Register `handler` for `kind`, returning the one it replaces.
    pub fn set_block(&mut self, kind: BlockKind, handler: BlockHandler) -> Option<BlockHandler> {
        self.blocks.insert(kind, handler)
    }

    pub fn remove_block(&mut self, kind: BlockKind) -> Option<BlockHandler> {
        self.blocks.remove(&kind)
    }

    pub fn segment(&self, kind: SegmentKindTag) -> Option<SegmentHandler> {
        self.segments.get(&kind).copied()
    }

    pub fn set_segment(
        &mut self,
        kind: SegmentKindTag,
        handler: SegmentHandler,
    ) -> Option<SegmentHandler> {
        self.segments.insert(kind, handler)
    }

    pub fn remove_segment(&mut self, kind: SegmentKindTag) -> Option<SegmentHandler> {
        self.segments.remove(&kind)
    }
}

/// Render `model` into `root`, reusing cached elements where allowed.
///
/// Returns the selection to restore, if the Model has one. Entity wrappers
/// that were under `root` but are no longer referenced by the Model are
/// detached and listed in [`ModelToDomContext::deleted_entities`].
#[tracing::instrument(skip_all)]
pub fn content_model_to_dom(
    dom: &mut Dom,
    root: NodeId,
    model: &mut ContentModelDocument,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<Option<DomSelection>, RenderError> {
    {
        let document_format = model.format.clone();
        let mut scope =
            ctx.stack_implicit(|implicit| implicit.segment.merge_from(&document_format));
        render_block_group(dom, root, model, &mut scope)?;
    }

    for node in std::mem::take(&mut ctx.released_list_children) {
        if dom.contains(node)
            && dom.parent(node).is_none()
            && dom.tag_name(node).is_some_and(is_block_tag)
        {
            ctx.rewrite.removed_block_elements.push(node);
        }
    }
    reconcile_entities(dom, root, ctx)?;

    let options = ctx.options();
    if options.contains(ModelToDomOptions::OPTIMIZE) {
        ctx.selection
            .with_anchors(|anchors| merge_adjacent_text(dom, root, anchors))?;
    }
    if options.contains(ModelToDomOptions::STRIP_REDUNDANT_FORMAT) {
        strip_redundant_format(dom, root)?;
    }

    tracing::debug!(
        target: "weft::model_to_dom",
        added = ctx.rewrite.added_block_elements.len(),
        removed = ctx.rewrite.removed_block_elements.len(),
        deleted_entities = ctx.deleted_entities.len(),
        "rendered model"
    );
    Ok(ctx.selection.to_dom_selection())
}

/// Render every block of `group` as children of `parent`.
///
/// The open list stack belongs to one block group: it starts empty here and
/// the caller's stack is put back afterwards, also when rendering fails.
pub fn render_block_group(
    dom: &mut Dom,
    parent: NodeId,
    group: &mut dyn BlockGroupNode,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<(), RenderError> {
    let saved = std::mem::take(&mut ctx.list);
    let result = render_blocks(dom, parent, group, ctx);
    ctx.list = saved;
    let ref_node = result?;
    remove_stale_nodes(dom, ref_node, None, ctx)?;
    Ok(())
}

fn render_blocks(
    dom: &mut Dom,
    parent: NodeId,
    group: &mut dyn BlockGroupNode,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<Option<NodeId>, RenderError> {
    let mut ref_node = dom.first_child(parent);
    for block in group.blocks_mut() {
        if !matches!(block, Block::ListItem(_)) {
            ctx.list.clear();
        }
        if ref_node.is_some_and(|r| dom.parent(r) != Some(parent)) {
            tracing::warn!(target: "weft::model_to_dom", "reference node moved away, appending");
            ref_node = None;
        }
        ref_node = render_block(dom, parent, block, ctx, ref_node)?;
    }
    Ok(ref_node)
}

/// Dispatch one block to its registered handler.
pub fn render_block(
    dom: &mut Dom,
    parent: NodeId,
    block: &mut Block,
    ctx: &mut ModelToDomContext<'_>,
    ref_node: Option<NodeId>,
) -> Result<Option<NodeId>, RenderError> {
    let kind = block.kind();
    let handler = ctx
        .config
        .model_handlers
        .block(kind)
        .ok_or(RenderError::MissingHandler {
            kind: kind.as_str(),
        })?;
    handler(dom, parent, block, ctx, ref_node)
}

/// Detach the siblings from `from` up to (not including) `until`. Entity
/// wrappers and delimiters stay; they are reconciled at the end.
fn remove_stale_nodes(
    dom: &mut Dom,
    from: Option<NodeId>,
    until: Option<NodeId>,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<(), DomError> {
    let mut cursor = from;
    while let Some(node) = cursor {
        if Some(node) == until {
            break;
        }
        cursor = dom.next_sibling(node);
        if is_entity_like(dom, node) || is_delimiter(dom, node) {
            continue;
        }
        if dom.tag_name(node).is_some_and(is_block_tag) {
            ctx.rewrite.removed_block_elements.push(node);
        }
        dom.detach(node)?;
    }
    Ok(())
}

/// Put a cached `element` at the reference position under `parent`.
///
/// When the element already sits later in `parent`, the stale nodes in
/// between are removed; otherwise it is moved before `ref_node`. Returns the
/// next reference node.
pub(crate) fn reuse_cached_element(
    dom: &mut Dom,
    parent: NodeId,
    element: NodeId,
    ref_node: Option<NodeId>,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<Option<NodeId>, DomError> {
    let later_sibling = dom.parent(element) == Some(parent)
        && ref_node.is_some_and(|r| dom.index_of(element) >= dom.index_of(r));
    if later_sibling {
        remove_stale_nodes(dom, ref_node, Some(element), ctx)?;
    } else {
        dom.insert_before(parent, element, ref_node)?;
    }
    Ok(dom.next_sibling(element))
}

/// `cached` when it is live, of the expected tag, allowed to be reused and
/// not an ancestor of where it would go.
pub(crate) fn cached_element(
    dom: &Dom,
    ctx: &ModelToDomContext<'_>,
    cached: Option<NodeId>,
    parent: NodeId,
    tag: &str,
) -> Option<NodeId> {
    cached.filter(|&element| {
        ctx.allow_cache_element
            && dom.contains(element)
            && dom.is_element_with_tag(element, tag)
            && !dom.contains_node(element, parent)
    })
}

/// Place the block element for a Model node: the cached one when usable,
/// otherwise a new `tag` element before `ref_node`. A reused element loses
/// its attributes so the caller can write the current format.
pub(crate) fn place_element(
    dom: &mut Dom,
    parent: NodeId,
    cached: Option<NodeId>,
    tag: &str,
    ref_node: Option<NodeId>,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<(NodeId, Option<NodeId>), DomError> {
    match cached_element(dom, ctx, cached, parent, tag) {
        Some(element) => {
            let next = reuse_cached_element(dom, parent, element, ref_node, ctx)?;
            dom.clear_attributes(element)?;
            Ok((element, next))
        }
        None => {
            let element = dom.create_element(tag);
            dom.insert_before(parent, element, ref_node)?;
            ctx.rewrite.added_block_elements.push(element);
            Ok((element, ref_node))
        }
    }
}

/// Append the cached element (stripped of attributes) or a new `tag`
/// element as the last child of `parent`.
pub(crate) fn adopt_element(
    dom: &mut Dom,
    parent: NodeId,
    cached: Option<NodeId>,
    tag: &str,
    ctx: &ModelToDomContext<'_>,
) -> Result<NodeId, DomError> {
    let element = match cached_element(dom, ctx, cached, parent, tag) {
        Some(element) => {
            dom.clear_attributes(element)?;
            element
        }
        None => dom.create_element(tag),
    };
    dom.append_child(parent, element)?;
    Ok(element)
}

/// Follow single element children down from `element`: where content goes
/// after format wrappers were applied to an empty element.
pub(crate) fn innermost(dom: &Dom, element: NodeId) -> NodeId {
    let mut node = element;
    while let [only] = dom.children(node) {
        if !dom.is_element(*only) {
            break;
        }
        node = *only;
    }
    node
}

/// Detach entity wrappers the Model no longer references, then delimiters
/// that no longer sit next to an entity.
fn reconcile_entities(
    dom: &mut Dom,
    root: NodeId,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<(), DomError> {
    for wrapper in find_entity_wrappers(dom, root) {
        if !ctx.referenced_entities.contains(&wrapper) {
            tracing::debug!(target: "weft::model_to_dom", "entity removed from model");
            dom.detach(wrapper)?;
            ctx.deleted_entities.push(wrapper);
        }
    }

    let orphans: Vec<NodeId> = dom
        .descendants(root)
        .into_iter()
        .filter(|&node| match delimiter_side(dom, node) {
            Some(DelimiterSide::Before) => !dom
                .next_sibling(node)
                .is_some_and(|n| is_entity_like(dom, n)),
            Some(DelimiterSide::After) => !dom
                .previous_sibling(node)
                .is_some_and(|n| is_entity_like(dom, n)),
            None => false,
        })
        .collect();
    for delimiter in orphans {
        dom.detach(delimiter)?;
    }
    Ok(())
}
