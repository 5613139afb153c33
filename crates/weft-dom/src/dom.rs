//! The node arena and its mutation primitives.

use crate::attrs::{Attribute, StyleDeclarations};
use crate::error::DomError;
use crate::node::{ElementData, NodeData, NodeId};

#[derive(Debug, Clone)]
struct NodeEntry {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    entry: Option<NodeEntry>,
}

/// Arena-backed markup tree.
///
/// Detached nodes stay alive (and their handles valid) until [`Dom::free`] or
/// [`Dom::reset`] is called, so a subtree can be moved around freely.
#[derive(Debug, Clone)]
pub struct Dom {
    slots: Vec<Slot>,
    free: Vec<u32>,
    document: NodeId,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        let mut dom = Self {
            slots: Vec::new(),
            free: Vec::new(),
            document: NodeId::new(0, 0),
        };
        dom.document = dom.alloc(NodeData::Document);
        dom
    }

    /// The document node every attached tree hangs from.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Drop every node. All previously issued handles become stale.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.entry = None;
            slot.generation = slot.generation.wrapping_add(1);
        }
        self.free = (0..self.slots.len() as u32).rev().collect();
        self.document = self.alloc(NodeData::Document);
        tracing::debug!(target: "weft::dom", slots = self.slots.len(), "tree reset");
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let entry = NodeEntry {
            data,
            parent: None,
            children: Vec::new(),
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            NodeId::new(index, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 0,
                entry: Some(entry),
            });
            NodeId::new(self.slots.len() as u32 - 1, 0)
        }
    }

    fn entry(&self, id: NodeId) -> Option<&NodeEntry> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut NodeEntry> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    fn try_entry_mut(&mut self, id: NodeId) -> Result<&mut NodeEntry, DomError> {
        self.entry_mut(id).ok_or(DomError::StaleNode(id))
    }

    fn ensure(&self, id: NodeId) -> Result<(), DomError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(DomError::StaleNode(id))
        }
    }

    /// Whether `id` still addresses a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.entry(id).is_some()
    }

    // === Creation ===

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Comment(text.into()))
    }

    // === Node inspection ===

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.entry(id).map(|e| &e.data)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.data(id).and_then(NodeData::as_element)
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match &mut self.try_entry_mut(id)?.data {
            NodeData::Element(e) => Ok(e),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    /// Lower-cased tag name, `None` for non-elements.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag())
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn is_element_with_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id).is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.data(id), Some(NodeData::Text(_)))
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.data(id).and_then(NodeData::as_text)
    }

    /// Length in characters of a text node, 0 for anything else.
    pub fn text_len(&self, id: NodeId) -> usize {
        self.text(id).map(|t| t.chars().count()).unwrap_or(0)
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        match &mut self.try_entry_mut(id)?.data {
            NodeData::Text(t) => {
                *t = text.into();
                Ok(())
            }
            _ => Err(DomError::NotText(id)),
        }
    }

    /// Concatenated text of every text node under `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            Some(NodeData::Text(t)) => out.push_str(t),
            Some(NodeData::Element(_)) | Some(NodeData::Document) => {
                for child in self.children(id) {
                    self.collect_text(*child, out);
                }
            }
            _ => {}
        }
    }

    // === Navigation ===

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).and_then(|e| e.parent)
    }

    /// Children of `id`; empty for stale handles and leaf nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.entry(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Index of `id` among its parent's children.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let idx = self.index_of(id)?;
        self.child_at(parent, idx + 1)
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let idx = self.index_of(id)?;
        idx.checked_sub(1).and_then(|i| self.child_at(parent, i))
    }

    /// Inclusive ancestor test: a node contains itself.
    pub fn contains_node(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Ancestors of `id`, nearest first, not including `id`.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            dom: self,
            next: self.parent(id),
        }
    }

    /// Pre-order list of `id` and everything under it.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    // === Mutation ===

    /// Remove `id` from its parent. The node stays alive.
    pub fn detach(&mut self, id: NodeId) -> Result<(), DomError> {
        let parent = self
            .entry(id)
            .ok_or(DomError::StaleNode(id))?
            .parent;
        if let Some(parent) = parent {
            if let Some(p) = self.entry_mut(parent) {
                p.children.retain(|c| *c != id);
            }
            if let Some(e) = self.entry_mut(id) {
                e.parent = None;
            }
        }
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` before `reference`, or append when
    /// `reference` is `None`. `child` is detached from wherever it was first.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.ensure(parent)?;
        self.ensure(child)?;
        if self.contains_node(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if let Some(r) = reference {
            if self.parent(r) != Some(parent) {
                return Err(DomError::NotAChild { parent, child: r });
            }
            if r == child {
                return Ok(());
            }
        }

        self.detach(child)?;

        let index = match reference {
            Some(r) => self
                .children(parent)
                .iter()
                .position(|c| *c == r)
                .ok_or(DomError::NotAChild { parent, child: r })?,
            None => self.child_count(parent),
        };
        self.try_entry_mut(parent)?.children.insert(index, child);
        self.try_entry_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detach `id` and release it together with its whole subtree.
    pub fn free(&mut self, id: NodeId) -> Result<(), DomError> {
        self.detach(id)?;
        for node in self.descendants(id) {
            let slot = &mut self.slots[node.index as usize];
            slot.entry = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(node.index);
        }
        Ok(())
    }

    /// Replace `id` by its children in its parent.
    pub fn unwrap(&mut self, id: NodeId) -> Result<(), DomError> {
        let Some(parent) = self.parent(id) else {
            return Ok(());
        };
        for child in self.children(id).to_vec() {
            self.insert_before(parent, child, Some(id))?;
        }
        self.detach(id)
    }

    /// Append every child of `from` to `to`, preserving order.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) -> Result<(), DomError> {
        for child in self.children(from).to_vec() {
            self.append_child(to, child)?;
        }
        Ok(())
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) -> Result<(), DomError> {
        for child in self.children(id).to_vec() {
            self.detach(child)?;
        }
        Ok(())
    }

    /// Move all children of `id` into a new `tag` element that becomes the
    /// only child of `id`.
    pub fn wrap_children(&mut self, id: NodeId, tag: &str) -> Result<NodeId, DomError> {
        self.ensure(id)?;
        let wrapper = self.create_element(tag);
        self.move_children(id, wrapper)?;
        self.append_child(id, wrapper)?;
        Ok(wrapper)
    }

    /// Copy of the node itself (tag and attributes, or text), unattached.
    pub fn clone_shallow(&mut self, id: NodeId) -> Result<NodeId, DomError> {
        let data = self.entry(id).ok_or(DomError::StaleNode(id))?.data.clone();
        Ok(self.alloc(data))
    }

    pub fn clone_deep(&mut self, id: NodeId) -> Result<NodeId, DomError> {
        let copy = self.clone_shallow(id)?;
        for child in self.children(id).to_vec() {
            let child_copy = self.clone_deep(child)?;
            self.append_child(copy, child_copy)?;
        }
        Ok(copy)
    }

    // === Attributes ===

    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        self.element(id).map(|e| e.attributes()).unwrap_or(&[])
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let element = self.element_mut(id)?;
        let value = value.into();
        match element
            .attrs
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            Some(attr) => attr.value = value,
            None => element.attrs.push(Attribute::new(name, value)),
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>, DomError> {
        let element = self.element_mut(id)?;
        Ok(element
            .attrs
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))
            .map(|idx| element.attrs.remove(idx).value))
    }

    /// Drop every attribute, class and inline style of `id`.
    pub fn clear_attributes(&mut self, id: NodeId) -> Result<(), DomError> {
        self.element_mut(id)?.attrs.clear();
        Ok(())
    }

    // === Class tokens ===

    pub fn class_names(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.attribute(id, "class")
            .unwrap_or("")
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.class_names(id).any(|c| c == class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        if self.has_class(id, class) {
            return Ok(());
        }
        let mut classes: Vec<String> = self.class_names(id).map(str::to_string).collect();
        classes.push(class.to_string());
        self.set_attribute(id, "class", classes.join(" "))
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        let classes: Vec<String> = self
            .class_names(id)
            .filter(|c| *c != class)
            .map(str::to_string)
            .collect();
        if classes.is_empty() {
            self.remove_attribute(id, "class")?;
            Ok(())
        } else {
            self.set_attribute(id, "class", classes.join(" "))
        }
    }

    // === Inline style ===

    pub fn style(&self, id: NodeId) -> StyleDeclarations {
        self.attribute(id, "style")
            .map(StyleDeclarations::parse)
            .unwrap_or_default()
    }

    pub fn style_property(&self, id: NodeId, name: &str) -> Option<String> {
        self.style(id).get(name).map(str::to_string)
    }

    /// Replace the whole `style` attribute; an empty set removes it.
    pub fn set_style(&mut self, id: NodeId, style: &StyleDeclarations) -> Result<(), DomError> {
        if style.is_empty() {
            self.remove_attribute(id, "style")?;
            Ok(())
        } else {
            self.set_attribute(id, "style", style.to_css())
        }
    }

    pub fn set_style_property(
        &mut self,
        id: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let mut style = self.style(id);
        style.set(name, value);
        self.set_style(id, &style)
    }

    pub fn remove_style_property(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        let mut style = self.style(id);
        if style.remove(name).is_some() {
            self.set_style(id, &style)?;
        }
        Ok(())
    }

    // === Editability ===

    /// The explicit `contenteditable` state of this element, if it sets one.
    pub fn content_editable(&self, id: NodeId) -> Option<bool> {
        match self.attribute(id, "contenteditable")?.trim() {
            "false" => Some(false),
            "" | "true" | "plaintext-only" => Some(true),
            _ => None,
        }
    }

    /// Whether `id` is editable, inheriting from the nearest ancestor that
    /// sets `contenteditable`.
    pub fn is_editable(&self, id: NodeId) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find_map(|n| self.content_editable(n))
            .unwrap_or(false)
    }
}

/// Iterator over the ancestors of a node.
pub struct Ancestors<'a> {
    dom: &'a Dom,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.dom.parent(current);
        Some(current)
    }
}
