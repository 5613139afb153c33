//! Built-in style sheet and the implicit formats implied by wrapper tags.

use weft_dom::StyleDeclarations;

use super::{BlockFormat, BoxSides, FormatBag, ListLevelFormat, SegmentFormat, SuperOrSubScript};

/// The user agent style a tag carries before any inline style applies.
pub type DefaultStyle = StyleDeclarations;

const BLOCK: &[(&str, &str)] = &[("display", "block")];

fn style_table(tag: &str) -> &'static [(&'static str, &'static str)] {
    match tag {
        "b" | "strong" => &[("font-weight", "bold")],
        "i" | "em" => &[("font-style", "italic")],
        "u" => &[("text-decoration", "underline")],
        "s" | "strike" | "del" => &[("text-decoration", "line-through")],
        "sup" => &[("vertical-align", "super"), ("font-size", "smaller")],
        "sub" => &[("vertical-align", "sub"), ("font-size", "smaller")],
        "a" => &[("text-decoration", "underline")],
        "code" => &[("font-family", "monospace")],
        "h1" => &[
            ("display", "block"),
            ("font-size", "2em"),
            ("font-weight", "bold"),
            ("margin-top", "0.67em"),
            ("margin-bottom", "0.67em"),
        ],
        "h2" => &[
            ("display", "block"),
            ("font-size", "1.5em"),
            ("font-weight", "bold"),
            ("margin-top", "0.83em"),
            ("margin-bottom", "0.83em"),
        ],
        "h3" => &[
            ("display", "block"),
            ("font-size", "1.17em"),
            ("font-weight", "bold"),
            ("margin-top", "1em"),
            ("margin-bottom", "1em"),
        ],
        "h4" => &[
            ("display", "block"),
            ("font-weight", "bold"),
            ("margin-top", "1.33em"),
            ("margin-bottom", "1.33em"),
        ],
        "h5" => &[
            ("display", "block"),
            ("font-size", "0.83em"),
            ("font-weight", "bold"),
            ("margin-top", "1.67em"),
            ("margin-bottom", "1.67em"),
        ],
        "h6" => &[
            ("display", "block"),
            ("font-size", "0.67em"),
            ("font-weight", "bold"),
            ("margin-top", "2.33em"),
            ("margin-bottom", "2.33em"),
        ],
        "p" => &[
            ("display", "block"),
            ("margin-top", "1em"),
            ("margin-bottom", "1em"),
        ],
        "blockquote" => &[
            ("display", "block"),
            ("margin-top", "1em"),
            ("margin-bottom", "1em"),
            ("margin-left", "40px"),
            ("margin-right", "40px"),
        ],
        "pre" => &[
            ("display", "block"),
            ("font-family", "monospace"),
            ("white-space", "pre"),
            ("margin-top", "1em"),
            ("margin-bottom", "1em"),
        ],
        "center" => &[("display", "block"), ("text-align", "center")],
        "ol" => &[
            ("display", "block"),
            ("margin-top", "1em"),
            ("margin-bottom", "1em"),
            ("padding-left", "40px"),
        ],
        "ul" => &[
            ("display", "block"),
            ("margin-top", "1em"),
            ("margin-bottom", "1em"),
            ("padding-left", "40px"),
        ],
        "li" => &[("display", "list-item")],
        "table" => &[("display", "table")],
        "tr" => &[("display", "table-row")],
        "td" => &[("display", "table-cell")],
        "th" => &[
            ("display", "table-cell"),
            ("font-weight", "bold"),
            ("text-align", "center"),
        ],
        "div" | "section" | "article" | "header" | "footer" | "main" | "nav" | "aside" | "hr"
        | "figure" | "address" => BLOCK,
        _ => &[],
    }
}

/// Default style for `tag`.
pub fn default_style(tag: &str) -> DefaultStyle {
    let mut style = DefaultStyle::default();
    for (name, value) in style_table(&tag.to_ascii_lowercase()) {
        style.set(name, value);
    }
    style
}

/// Whether `tag` is laid out as a block by default.
pub fn is_block_tag(tag: &str) -> bool {
    default_style(tag)
        .get("display")
        .is_some_and(|d| d != "inline")
}

/// Formats implied by rendering inside a wrapper element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImplicitFormat {
    pub segment: SegmentFormat,
    pub block: BlockFormat,
    pub list_level: ListLevelFormat,
}

impl ImplicitFormat {
    /// Layer `other` over this one.
    pub fn merge_from(&mut self, other: &ImplicitFormat) {
        self.segment.merge_from(&other.segment);
        self.block.merge_from(&other.block);
        self.list_level.merge_from(&other.list_level);
    }
}

fn vertical_margins(value: &str) -> BoxSides {
    BoxSides {
        top: Some(value.into()),
        bottom: Some(value.into()),
        ..Default::default()
    }
}

fn heading(font_size: Option<&str>, margin: &str) -> ImplicitFormat {
    ImplicitFormat {
        segment: SegmentFormat {
            font_weight: Some("bold".into()),
            font_size: font_size.map(Into::into),
            ..Default::default()
        },
        block: BlockFormat {
            margin: vertical_margins(margin),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// What rendering children under a `tag` wrapper implies, so appliers can
/// skip writing values the wrapper already provides.
pub fn default_implicit_format(tag: &str) -> ImplicitFormat {
    match tag.to_ascii_lowercase().as_str() {
        "a" => ImplicitFormat {
            segment: SegmentFormat {
                underline: Some(true),
                ..Default::default()
            },
            ..Default::default()
        },
        "b" | "strong" | "th" => ImplicitFormat {
            segment: SegmentFormat {
                font_weight: Some("bold".into()),
                ..Default::default()
            },
            ..Default::default()
        },
        "code" => ImplicitFormat {
            segment: SegmentFormat {
                font_family: Some("monospace".into()),
                ..Default::default()
            },
            ..Default::default()
        },
        "sup" => ImplicitFormat {
            segment: SegmentFormat {
                super_or_sub: Some(SuperOrSubScript::Super),
                font_size: Some("smaller".into()),
                ..Default::default()
            },
            ..Default::default()
        },
        "sub" => ImplicitFormat {
            segment: SegmentFormat {
                super_or_sub: Some(SuperOrSubScript::Sub),
                font_size: Some("smaller".into()),
                ..Default::default()
            },
            ..Default::default()
        },
        "h1" => heading(Some("2em"), "0.67em"),
        "h2" => heading(Some("1.5em"), "0.83em"),
        "h3" => heading(Some("1.17em"), "1em"),
        "h4" => heading(None, "1.33em"),
        "h5" => heading(Some("0.83em"), "1.67em"),
        "h6" => heading(Some("0.67em"), "2.33em"),
        "p" => ImplicitFormat {
            block: BlockFormat {
                margin: vertical_margins("1em"),
                ..Default::default()
            },
            ..Default::default()
        },
        "blockquote" => ImplicitFormat {
            block: BlockFormat {
                margin: BoxSides {
                    top: Some("1em".into()),
                    bottom: Some("1em".into()),
                    left: Some("40px".into()),
                    right: Some("40px".into()),
                },
                ..Default::default()
            },
            ..Default::default()
        },
        "pre" => ImplicitFormat {
            segment: SegmentFormat {
                font_family: Some("monospace".into()),
                ..Default::default()
            },
            block: BlockFormat {
                white_space: Some("pre".into()),
                margin: vertical_margins("1em"),
                ..Default::default()
            },
            ..Default::default()
        },
        "ol" | "ul" => ImplicitFormat {
            list_level: ListLevelFormat {
                margin: vertical_margins("1em"),
                padding: BoxSides {
                    left: Some("40px".into()),
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        },
        _ => ImplicitFormat::default(),
    }
}
