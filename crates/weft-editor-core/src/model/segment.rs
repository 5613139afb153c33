use smol_str::SmolStr;
use weft_dom::{Attribute, NodeId};

use super::block::Block;
use super::{BlockGroupKind, BlockGroupNode};
use crate::format::{CodeFormat, Dataset, EntityInfoFormat, ImageFormat, LinkFormat, SegmentFormat};

/// Inline unit of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub format: SegmentFormat,
    pub is_selected: bool,
    pub link: Option<Link>,
    pub code: Option<CodeFormat>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SegmentKind {
    Text(String),
    Br,
    Image(Image),
    General(General),
    Entity(Entity),
    /// Zero-width caret placeholder.
    SelectionMarker,
}

/// Discriminant of [`SegmentKind`], used to key the segment handler map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegmentKindTag {
    Text,
    Br,
    Image,
    General,
    Entity,
    SelectionMarker,
}

impl SegmentKindTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Br => "Br",
            Self::Image => "Image",
            Self::General => "General",
            Self::Entity => "Entity",
            Self::SelectionMarker => "SelectionMarker",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    pub format: LinkFormat,
    pub dataset: Dataset,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    pub src: String,
    pub format: ImageFormat,
    pub dataset: Dataset,
    /// Selected as an object rather than as part of a text range.
    pub is_selected_as_image_selection: bool,
}

/// An element the Model does not understand, kept as a shallow copy of the
/// element (tag and attributes) with its content converted as blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct General {
    pub tag: SmolStr,
    pub attributes: Vec<Attribute>,
    pub blocks: Vec<Block>,
    pub cached_element: Option<NodeId>,
}

impl General {
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }
}

impl BlockGroupNode for General {
    fn group_kind(&self) -> BlockGroupKind {
        BlockGroupKind::General
    }

    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}

/// Host-owned opaque content. The wrapper element is live markup that the
/// Model references but does not own.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub wrapper: NodeId,
    pub entity_format: EntityInfoFormat,
}

impl Segment {
    pub fn new(kind: SegmentKind) -> Self {
        Self {
            kind,
            format: SegmentFormat::default(),
            is_selected: false,
            link: None,
            code: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(SegmentKind::Text(text.into()))
    }

    pub fn br() -> Self {
        Self::new(SegmentKind::Br)
    }

    /// A selected caret marker.
    pub fn marker() -> Self {
        Self::new(SegmentKind::SelectionMarker).with_selected(true)
    }

    pub fn image(src: impl Into<String>) -> Self {
        Self::new(SegmentKind::Image(Image {
            src: src.into(),
            ..Default::default()
        }))
    }

    pub fn entity(entity: Entity) -> Self {
        Self::new(SegmentKind::Entity(entity))
    }

    pub fn general(general: General) -> Self {
        Self::new(SegmentKind::General(general))
    }

    pub fn with_format(mut self, format: SegmentFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.is_selected = selected;
        self
    }

    pub fn with_link(mut self, link: Option<Link>) -> Self {
        self.link = link;
        self
    }

    pub fn with_code(mut self, code: Option<CodeFormat>) -> Self {
        self.code = code;
        self
    }

    pub fn tag(&self) -> SegmentKindTag {
        match self.kind {
            SegmentKind::Text(_) => SegmentKindTag::Text,
            SegmentKind::Br => SegmentKindTag::Br,
            SegmentKind::Image(_) => SegmentKindTag::Image,
            SegmentKind::General(_) => SegmentKindTag::General,
            SegmentKind::Entity(_) => SegmentKindTag::Entity,
            SegmentKind::SelectionMarker => SegmentKindTag::SelectionMarker,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self.kind, SegmentKind::SelectionMarker)
    }

    pub fn is_br(&self) -> bool {
        matches!(self.kind, SegmentKind::Br)
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            SegmentKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut String> {
        match &mut self.kind {
            SegmentKind::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Same format, link, code and selection state: two such text segments
    /// can be merged into one.
    pub fn same_style_as(&self, other: &Segment) -> bool {
        self.format == other.format
            && self.link == other.link
            && self.code == other.code
            && self.is_selected == other.is_selected
    }
}
