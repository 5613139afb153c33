//! Entity wrappers and the delimiters around them.
//!
//! An entity is opaque content owned by the host (widgets, embeds). Its
//! wrapper element is never recreated: the converters move the live wrapper
//! around and only remove it when the Model no longer references it.

use weft_dom::{Dom, DomError, NodeId, ZERO_WIDTH_SPACE};

pub const ENTITY_CLASS: &str = "_Entity";
pub const ENTITY_TYPE_PREFIX: &str = "_EType_";
pub const ENTITY_ID_PREFIX: &str = "_EId_";
pub const ENTITY_READONLY_CLASS: &str = "_EReadonly_1";
pub const DELIMITER_BEFORE_CLASS: &str = "entityDelimiterBefore";
pub const DELIMITER_AFTER_CLASS: &str = "entityDelimiterAfter";
pub const COAUTHORING_MARKER_CLASS: &str = "_CoauthMarker";

/// Element explicitly marked as an entity wrapper.
pub fn is_entity_wrapper(dom: &Dom, node: NodeId) -> bool {
    dom.is_element(node) && dom.has_class(node, ENTITY_CLASS)
}

/// Element treated as an entity: marked, or forced read-only.
pub fn is_entity_like(dom: &Dom, node: NodeId) -> bool {
    is_entity_wrapper(dom, node)
        || (dom.is_element(node) && dom.content_editable(node) == Some(false))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterSide {
    Before,
    After,
}

pub fn delimiter_side(dom: &Dom, node: NodeId) -> Option<DelimiterSide> {
    if !dom.is_element_with_tag(node, "span") {
        return None;
    }
    if dom.has_class(node, DELIMITER_BEFORE_CLASS) {
        Some(DelimiterSide::Before)
    } else if dom.has_class(node, DELIMITER_AFTER_CLASS) {
        Some(DelimiterSide::After)
    } else {
        None
    }
}

pub fn is_delimiter(dom: &Dom, node: NodeId) -> bool {
    delimiter_side(dom, node).is_some()
}

/// Create an unattached delimiter holding a zero-width space.
pub fn create_delimiter(dom: &mut Dom, side: DelimiterSide) -> Result<NodeId, DomError> {
    let span = dom.create_element("span");
    let class = match side {
        DelimiterSide::Before => DELIMITER_BEFORE_CLASS,
        DelimiterSide::After => DELIMITER_AFTER_CLASS,
    };
    dom.add_class(span, class)?;
    let text = dom.create_text(ZERO_WIDTH_SPACE.to_string());
    dom.append_child(span, text)?;
    Ok(span)
}

/// Every entity under `root`, marked or read-only, in document order.
/// Entities nested in another entity belong to it and are not listed.
pub fn find_entity_wrappers(dom: &Dom, root: NodeId) -> Vec<NodeId> {
    let mut found = Vec::new();
    let mut stack: Vec<NodeId> = dom.children(root).iter().rev().copied().collect();
    while let Some(node) = stack.pop() {
        if is_entity_like(dom, node) {
            found.push(node);
        } else {
            stack.extend(dom.children(node).iter().rev().copied());
        }
    }
    found
}
