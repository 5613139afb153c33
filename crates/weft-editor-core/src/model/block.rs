use smol_str::SmolStr;
use weft_dom::NodeId;

use super::segment::{Entity, General, Segment};
use super::table::Table;
use super::{BlockGroupKind, BlockGroupNode};
use crate::format::{BlockFormat, Dataset, ListItemFormat, ListLevelFormat, SegmentFormat};

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    Divider(Divider),
    Entity(EntityBlock),
    General(General),
    FormatContainer(FormatContainer),
    ListItem(ListItem),
}

/// Discriminant of [`Block`], used to key the block handler map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    Paragraph,
    Table,
    Divider,
    Entity,
    General,
    FormatContainer,
    ListItem,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paragraph => "Paragraph",
            Self::Table => "Table",
            Self::Divider => "Divider",
            Self::Entity => "Entity",
            Self::General => "General",
            Self::FormatContainer => "FormatContainer",
            Self::ListItem => "ListItem",
        }
    }
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Paragraph(_) => BlockKind::Paragraph,
            Block::Table(_) => BlockKind::Table,
            Block::Divider(_) => BlockKind::Divider,
            Block::Entity(_) => BlockKind::Entity,
            Block::General(_) => BlockKind::General,
            Block::FormatContainer(_) => BlockKind::FormatContainer,
            Block::ListItem(_) => BlockKind::ListItem,
        }
    }

    /// The block as a group of blocks, for the kinds that are groups.
    pub fn as_group(&self) -> Option<&dyn BlockGroupNode> {
        match self {
            Block::General(g) => Some(g),
            Block::FormatContainer(c) => Some(c),
            Block::ListItem(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut dyn BlockGroupNode> {
        match self {
            Block::General(g) => Some(g),
            Block::FormatContainer(c) => Some(c),
            Block::ListItem(l) => Some(l),
            _ => None,
        }
    }

    /// Consume a group block and return its children.
    pub fn into_blocks(self) -> Result<Vec<Block>, Block> {
        match self {
            Block::General(g) => Ok(g.blocks),
            Block::FormatContainer(c) => Ok(c.blocks),
            Block::ListItem(l) => Ok(l.blocks),
            other => Err(other),
        }
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    /// Drop the remembered markup element of this block only.
    pub fn clear_cached_element(&mut self) {
        match self {
            Block::Paragraph(p) => p.cached_element = None,
            Block::Table(t) => t.cached_element = None,
            Block::Divider(d) => d.cached_element = None,
            Block::Entity(_) => {}
            Block::General(g) => g.cached_element = None,
            Block::FormatContainer(c) => c.cached_element = None,
            Block::ListItem(l) => l.cached_element = None,
        }
    }
}

/// Semantic wrapper of a paragraph, e.g. a heading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphDecorator {
    pub tag_name: SmolStr,
    pub format: SegmentFormat,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub segments: Vec<Segment>,
    pub format: BlockFormat,
    /// Baseline format for segments, stamped on the wrapper.
    pub segment_format: Option<SegmentFormat>,
    pub decorator: Option<ParagraphDecorator>,
    /// Render children straight into the parent unless a wrapper is forced.
    pub is_implicit: bool,
    pub cached_element: Option<NodeId>,
}

impl Paragraph {
    pub fn new(is_implicit: bool) -> Self {
        Self {
            is_implicit,
            ..Default::default()
        }
    }

    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_format(mut self, format: BlockFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_decorator(mut self, tag_name: &str) -> Self {
        self.decorator = Some(ParagraphDecorator {
            tag_name: tag_name.into(),
            format: SegmentFormat::default(),
        });
        self
    }

    pub fn marker_index(&self) -> Option<usize> {
        self.segments.iter().position(Segment::is_marker)
    }

    /// No content besides markers and line breaks.
    pub fn is_visually_empty(&self) -> bool {
        self.segments.iter().all(|s| s.is_marker() || s.is_br())
    }
}

/// Horizontal rule or an empty styled `div`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Divider {
    pub tag_name: SmolStr,
    pub format: BlockFormat,
    pub is_selected: bool,
    pub cached_element: Option<NodeId>,
}

impl Divider {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityBlock {
    pub entity: Entity,
    pub format: SegmentFormat,
    pub is_selected: bool,
}

/// Semantic container such as `blockquote` or `pre`, tagged by the element
/// it renders as.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatContainer {
    pub tag_name: SmolStr,
    pub format: BlockFormat,
    pub blocks: Vec<Block>,
    pub cached_element: Option<NodeId>,
}

impl FormatContainer {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }
}

impl BlockGroupNode for FormatContainer {
    fn group_kind(&self) -> BlockGroupKind {
        BlockGroupKind::FormatContainer
    }

    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Ordered,
    Unordered,
}

impl ListType {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Ordered => "ol",
            Self::Unordered => "ul",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ol" => Some(Self::Ordered),
            "ul" => Some(Self::Unordered),
            _ => None,
        }
    }
}

/// One nesting of list semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct ListLevel {
    pub list_type: ListType,
    pub format: ListLevelFormat,
    pub dataset: Dataset,
}

impl ListLevel {
    pub fn new(list_type: ListType) -> Self {
        Self {
            list_type,
            format: ListLevelFormat::default(),
            dataset: Dataset::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListItem {
    pub blocks: Vec<Block>,
    /// Outermost level first. Never empty while the item is attached.
    pub levels: Vec<ListLevel>,
    pub format: ListItemFormat,
    /// Format of the list marker itself.
    pub format_holder: SegmentFormat,
    pub cached_element: Option<NodeId>,
}

impl BlockGroupNode for ListItem {
    fn group_kind(&self) -> BlockGroupKind {
        BlockGroupKind::ListItem
    }

    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}
