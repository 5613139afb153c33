use crate::config::{DomToModelOptions, EditorConfig};
use crate::format::{BlockFormat, CodeFormat, SegmentFormat};
use crate::model::{Link, ListLevel, ParagraphDecorator, Segment, SegmentKind};
use crate::selection::DomSelection;

/// State threaded through markup→Model conversion.
///
/// Processors mutate the ambient parts (`segment_format`, `block_format`,
/// `link`, `code`, `decorator`) only inside [`DomToModelContext::scoped`],
/// which puts the previous values back afterwards.
pub struct DomToModelContext<'a> {
    pub config: &'a EditorConfig,
    pub segment_format: SegmentFormat,
    pub block_format: BlockFormat,
    pub link: Option<Link>,
    pub code: Option<CodeFormat>,
    pub decorator: Option<ParagraphDecorator>,
    /// Levels of the lists enclosing the current node, outermost first.
    pub list_levels: Vec<ListLevel>,
    pub selection: Option<DomSelection>,
    /// Between the start and the end of a range selection.
    pub is_in_selection: bool,
    pub allow_cache_element: bool,
}

/// Ambient values saved by [`DomToModelContext::scoped`].
struct Ambient {
    segment_format: SegmentFormat,
    block_format: BlockFormat,
    link: Option<Link>,
    code: Option<CodeFormat>,
    decorator: Option<ParagraphDecorator>,
}

impl<'a> DomToModelContext<'a> {
    pub fn new(config: &'a EditorConfig) -> Self {
        Self {
            config,
            segment_format: SegmentFormat::default(),
            block_format: BlockFormat::default(),
            link: None,
            code: None,
            decorator: None,
            list_levels: Vec::new(),
            selection: None,
            is_in_selection: false,
            allow_cache_element: config
                .dom_to_model
                .contains(DomToModelOptions::ALLOW_CACHE_ELEMENT),
        }
    }

    pub fn with_selection(mut self, selection: Option<DomSelection>) -> Self {
        self.selection = selection;
        self
    }

    /// Run `f` and restore the ambient formats it may have changed.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = Ambient {
            segment_format: self.segment_format.clone(),
            block_format: self.block_format.clone(),
            link: self.link.clone(),
            code: self.code.clone(),
            decorator: self.decorator.clone(),
        };
        let result = f(self);
        self.segment_format = saved.segment_format;
        self.block_format = saved.block_format;
        self.link = saved.link;
        self.code = saved.code;
        self.decorator = saved.decorator;
        result
    }

    /// A segment carrying the ambient format, link and code, selected when
    /// inside a range selection.
    pub fn segment(&self, kind: SegmentKind) -> Segment {
        Segment::new(kind)
            .with_format(self.segment_format.clone())
            .with_link(self.link.clone())
            .with_code(self.code.clone())
            .with_selected(self.is_in_selection)
    }

    pub fn marker(&self) -> Segment {
        self.segment(SegmentKind::SelectionMarker).with_selected(true)
    }
}
