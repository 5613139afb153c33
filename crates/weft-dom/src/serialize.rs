//! HTML serialization of arena subtrees.

use crate::NBSP;
use crate::dom::Dom;
use crate::node::{NodeData, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements that never have children or a closing tag.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

impl Dom {
    /// Serialize the children of `id`.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_node(*child, &mut out);
        }
        out
    }

    /// Serialize `id` itself and everything under it.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            Some(NodeData::Document) => {
                for child in self.children(id) {
                    self.write_node(*child, out);
                }
            }
            Some(NodeData::Element(element)) => {
                out.push('<');
                out.push_str(element.tag());
                for attr in element.attributes() {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    escape_attribute(&attr.value, out);
                    out.push('"');
                }
                out.push('>');
                if is_void_element(element.tag()) {
                    return;
                }
                for child in self.children(id) {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(element.tag());
                out.push('>');
            }
            Some(NodeData::Text(text)) => escape_text(text, out),
            Some(NodeData::Comment(text)) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            None => {}
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            NBSP => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            NBSP => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_escapes() {
        let mut dom = Dom::new();
        let p = dom.create_element("P");
        dom.set_attribute(p, "title", "a \"b\" & c").unwrap();
        let text = dom.create_text("1 < 2 &\u{a0}3");
        let br = dom.create_element("br");
        dom.append_child(p, text).unwrap();
        dom.append_child(p, br).unwrap();
        assert_eq!(
            dom.outer_html(p),
            "<p title=\"a &quot;b&quot; &amp; c\">1 &lt; 2 &amp;&nbsp;3<br></p>"
        );
        assert_eq!(dom.inner_html(p), "1 &lt; 2 &amp;&nbsp;3<br>");
    }

    #[test]
    fn test_void_elements() {
        assert!(is_void_element("img"));
        assert!(is_void_element("BR"));
        assert!(!is_void_element("span"));
    }
}
