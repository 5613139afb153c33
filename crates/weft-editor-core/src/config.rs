//! Conversion options and the registries hosts customize.

use bitflags::bitflags;

use crate::dom_to_model::{DomToModelContext, ElementProcessorMap};
use crate::format::handlers::FormatHandlers;
use crate::model_to_dom::{ModelHandlerMap, ModelToDomContext};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct DomToModelOptions: u32 {
        /// Model nodes remember the element they were read from.
        const ALLOW_CACHE_ELEMENT = 1 << 0;
        const NORMALIZE = 1 << 1;
    }
}

impl Default for DomToModelOptions {
    fn default() -> Self {
        Self::NORMALIZE
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct ModelToDomOptions: u32 {
        /// Reuse the markup cached on Model nodes.
        const ALLOW_CACHE_ELEMENT = 1 << 0;
        /// Merge text runs and drop bare wrappers after each paragraph.
        const OPTIMIZE = 1 << 1;
        /// Surround inline entities with delimiter elements.
        const ADD_ENTITY_DELIMITERS = 1 << 2;
        /// Drop inherited style values after the render, for export.
        const STRIP_REDUNDANT_FORMAT = 1 << 3;
    }
}

impl Default for ModelToDomOptions {
    fn default() -> Self {
        Self::ALLOW_CACHE_ELEMENT | Self::OPTIMIZE
    }
}

/// Everything a conversion needs besides the trees themselves.
///
/// Build one per editor, adjust the registries, then create a fresh context
/// for every conversion.
#[derive(Debug, Clone, Default)]
pub struct EditorConfig {
    pub dom_to_model: DomToModelOptions,
    pub model_to_dom: ModelToDomOptions,
    pub handlers: FormatHandlers,
    pub processors: ElementProcessorMap,
    pub model_handlers: ModelHandlerMap,
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dom_to_model_options(mut self, options: DomToModelOptions) -> Self {
        self.dom_to_model = options;
        self
    }

    pub fn with_model_to_dom_options(mut self, options: ModelToDomOptions) -> Self {
        self.model_to_dom = options;
        self
    }

    pub fn with_handlers(mut self, handlers: FormatHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn with_processors(mut self, processors: ElementProcessorMap) -> Self {
        self.processors = processors;
        self
    }

    pub fn with_model_handlers(mut self, model_handlers: ModelHandlerMap) -> Self {
        self.model_handlers = model_handlers;
        self
    }

    pub fn dom_to_model_context(&self) -> DomToModelContext<'_> {
        DomToModelContext::new(self)
    }

    pub fn model_to_dom_context(&self) -> ModelToDomContext<'_> {
        ModelToDomContext::new(self)
    }
}
