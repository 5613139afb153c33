//! Loading HTML text into the arena through html5ever.

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::dom::Dom;
use crate::error::DomError;
use crate::node::NodeId;

/// Parse `html` as body content into a fresh tree.
///
/// Returns the tree and the `div` root, attached to the document node, that
/// holds the parsed content.
pub fn parse_fragment(html: &str) -> Result<(Dom, NodeId), DomError> {
    let mut dom = Dom::new();
    let root = dom.create_element("div");
    dom.append_child(dom.document(), root)?;
    dom.append_html(root, html)?;
    Ok((dom, root))
}

impl Dom {
    /// Parse `html` and append the resulting body content under `parent`.
    pub fn append_html(&mut self, parent: NodeId, html: &str) -> Result<(), DomError> {
        let parsed = parse_document(RcDom::default(), ParseOpts::default()).one(html);
        let Some(body) = find_element(&parsed.document, "body") else {
            tracing::warn!(target: "weft::dom", "parsed html has no body");
            return Ok(());
        };
        let children = body.children.borrow();
        for child in children.iter() {
            self.import(parent, child)?;
        }
        tracing::trace!(target: "weft::dom", nodes = children.len(), "imported html");
        Ok(())
    }

    fn import(&mut self, parent: NodeId, handle: &Handle) -> Result<(), DomError> {
        let id = match &handle.data {
            RcNodeData::Element { name, attrs, .. } => {
                let id = self.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    self.set_attribute(id, &attr.name.local, attr.value.to_string())?;
                }
                id
            }
            RcNodeData::Text { contents } => self.create_text(contents.borrow().to_string()),
            RcNodeData::Comment { contents } => self.create_comment(contents.to_string()),
            _ => return Ok(()),
        };
        self.append_child(parent, id)?;
        for child in handle.children.borrow().iter() {
            self.import(id, child)?;
        }
        Ok(())
    }
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let RcNodeData::Element { name, .. } = &handle.data {
        if &*name.local == tag {
            return Some(handle.clone());
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}
