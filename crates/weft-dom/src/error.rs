use miette::Diagnostic;
use thiserror::Error;

use crate::NodeId;

#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("node {0:?} is no longer part of this tree")]
    #[diagnostic(code(weft::dom::stale_node))]
    StaleNode(NodeId),

    #[error("node {child:?} is not a child of {parent:?}")]
    #[diagnostic(code(weft::dom::not_a_child))]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("cannot insert {child:?} into {parent:?}: it would become its own ancestor")]
    #[diagnostic(code(weft::dom::hierarchy_request))]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("node {0:?} is not an element")]
    #[diagnostic(code(weft::dom::not_an_element))]
    NotAnElement(NodeId),

    #[error("node {0:?} is not a text node")]
    #[diagnostic(code(weft::dom::not_text))]
    NotText(NodeId),
}
