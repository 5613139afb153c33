//! Markup cleanup after a render.
//!
//! Bare `span` wrappers are dropped, equal inline siblings are merged and
//! adjacent text runs are joined. Every step rebinds the caller's anchors so
//! a selection recorded before optimizing still points at the same place.
//! Entity wrappers and delimiters are never touched.

use std::collections::BTreeMap;

use weft_dom::{Dom, DomError, DomPosition, NodeId};

use crate::entity::{is_delimiter, is_entity_like};

/// Inline tags whose equal neighbours can be merged into one element.
const MERGEABLE_TAGS: &[&str] = &[
    "span", "b", "em", "i", "u", "sub", "sup", "strike", "s", "a", "code", "strong",
];

/// Style properties a child inherits from its parent.
const INHERITED_PROPERTIES: &[&str] = &[
    "color",
    "direction",
    "font-family",
    "font-size",
    "font-style",
    "font-weight",
    "letter-spacing",
    "line-height",
    "text-align",
    "white-space",
];

/// Simplify everything under `root`, leaving `root` itself in place.
#[tracing::instrument(level = "trace", skip_all)]
pub fn optimize(dom: &mut Dom, root: NodeId, anchors: &mut [DomPosition]) -> Result<(), DomError> {
    unwrap_bare_spans(dom, root, anchors)?;
    merge_equal_siblings(dom, root, anchors)?;
    merge_text_runs(dom, root, anchors)?;
    for child in dom.children(root).to_vec() {
        if dom.is_element(child) && !is_entity_like(dom, child) {
            optimize(dom, child, anchors)?;
        }
    }
    Ok(())
}

/// Join adjacent text nodes anywhere under `root`.
pub fn merge_adjacent_text(
    dom: &mut Dom,
    root: NodeId,
    anchors: &mut [DomPosition],
) -> Result<(), DomError> {
    merge_text_runs(dom, root, anchors)?;
    for child in dom.children(root).to_vec() {
        if dom.is_element(child) && !is_entity_like(dom, child) {
            merge_adjacent_text(dom, child, anchors)?;
        }
    }
    Ok(())
}

/// Replace `element` by its children, moving anchors inside it to the
/// equivalent position in the parent. The element is freed.
pub fn unwrap_with_anchors(
    dom: &mut Dom,
    element: NodeId,
    anchors: &mut [DomPosition],
) -> Result<(), DomError> {
    let (Some(parent), Some(index)) = (dom.parent(element), dom.index_of(element)) else {
        return Ok(());
    };
    let count = dom.child_count(element);
    for anchor in anchors.iter_mut() {
        if anchor.node == element {
            *anchor = DomPosition::new(parent, index + anchor.offset);
        } else if anchor.node == parent && anchor.offset > index {
            anchor.offset = anchor.offset + count - 1;
        }
    }
    dom.unwrap(element)?;
    dom.free(element)
}

fn is_bare_span(dom: &Dom, node: NodeId) -> bool {
    if !dom.is_element_with_tag(node, "span") || !dom.attributes(node).is_empty() {
        return false;
    }
    // An image keeps its span so image selection has a stable host.
    !matches!(dom.children(node), [only] if dom.is_element_with_tag(*only, "img"))
}

fn unwrap_bare_spans(
    dom: &mut Dom,
    parent: NodeId,
    anchors: &mut [DomPosition],
) -> Result<(), DomError> {
    let mut index = 0;
    while let Some(child) = dom.child_at(parent, index) {
        if is_bare_span(dom, child) {
            unwrap_with_anchors(dom, child, anchors)?;
        } else {
            index += 1;
        }
    }
    Ok(())
}

fn can_merge(dom: &Dom, first: NodeId, second: NodeId) -> bool {
    let (Some(a), Some(b)) = (dom.tag_name(first), dom.tag_name(second)) else {
        return false;
    };
    a == b
        && MERGEABLE_TAGS.contains(&a)
        && dom.attributes(first) == dom.attributes(second)
        && !is_delimiter(dom, first)
        && !is_entity_like(dom, first)
}

/// `second` sits right after `first` under `parent` at `index` and is about
/// to be folded into it; `len` is the size of `first` in anchor units.
fn rebind_merge(
    anchors: &mut [DomPosition],
    parent: NodeId,
    index: usize,
    first: NodeId,
    second: NodeId,
    len: usize,
) {
    for anchor in anchors.iter_mut() {
        if anchor.node == second {
            *anchor = DomPosition::new(first, len + anchor.offset);
        } else if anchor.node == parent && anchor.offset == index {
            *anchor = DomPosition::new(first, len);
        } else if anchor.node == parent && anchor.offset > index {
            anchor.offset -= 1;
        }
    }
}

fn merge_equal_siblings(
    dom: &mut Dom,
    parent: NodeId,
    anchors: &mut [DomPosition],
) -> Result<(), DomError> {
    let mut index = 1;
    while let Some(second) = dom.child_at(parent, index) {
        let Some(first) = dom.child_at(parent, index - 1) else {
            break;
        };
        if can_merge(dom, first, second) {
            rebind_merge(anchors, parent, index, first, second, dom.child_count(first));
            dom.move_children(second, first)?;
            dom.free(second)?;
        } else {
            index += 1;
        }
    }
    Ok(())
}

fn merge_text_runs(
    dom: &mut Dom,
    parent: NodeId,
    anchors: &mut [DomPosition],
) -> Result<(), DomError> {
    let mut index = 1;
    while let Some(second) = dom.child_at(parent, index) {
        let Some(first) = dom.child_at(parent, index - 1) else {
            break;
        };
        match (dom.text(first), dom.text(second)) {
            (Some(a), Some(b)) => {
                let joined = format!("{a}{b}");
                rebind_merge(anchors, parent, index, first, second, dom.text_len(first));
                dom.set_text(first, joined)?;
                dom.free(second)?;
            }
            _ => index += 1,
        }
    }
    Ok(())
}

/// Drop inline style values and `dir` attributes that repeat what the
/// parent already provides. Used when exporting markup.
#[tracing::instrument(skip_all)]
pub fn strip_redundant_format(dom: &mut Dom, root: NodeId) -> Result<(), DomError> {
    let style = dom.style(root);
    let inherited: BTreeMap<&'static str, String> = INHERITED_PROPERTIES
        .iter()
        .filter_map(|name| style.get(name).map(|v| (*name, v.to_string())))
        .collect();
    let dir = dom.attribute(root, "dir").map(str::to_string);
    strip_children(dom, root, &inherited, dir.as_deref())
}

fn strip_children(
    dom: &mut Dom,
    parent: NodeId,
    inherited: &BTreeMap<&'static str, String>,
    dir: Option<&str>,
) -> Result<(), DomError> {
    for child in dom.children(parent).to_vec() {
        if !dom.is_element(child) || is_entity_like(dom, child) {
            continue;
        }

        let mut own = inherited.clone();
        let mut style = dom.style(child);
        let mut stripped = false;
        for name in INHERITED_PROPERTIES {
            let Some(value) = style.get(name).map(str::to_string) else {
                continue;
            };
            if inherited.get(name) == Some(&value) {
                style.remove(name);
                stripped = true;
            } else {
                own.insert(name, value);
            }
        }
        if stripped {
            dom.set_style(child, &style)?;
        }

        let mut child_dir = dir.map(str::to_string);
        if let Some(value) = dom.attribute(child, "dir").map(str::to_string) {
            if Some(value.as_str()) == dir {
                dom.remove_attribute(child, "dir")?;
            } else {
                child_dir = Some(value);
            }
        }

        strip_children(dom, child, &own, child_dir.as_deref())?;
    }
    Ok(())
}
