//! Format bags and the handler registry that reads and writes them.
//!
//! A format bag is a flat struct of optional values. Bags of the same kind
//! compose by shallow override: [`FormatBag::merge_from`] copies every key
//! the other bag sets and leaves the rest alone. Bags of different categories
//! never merge into each other.

pub mod defaults;
pub mod handlers;
mod traits;

use std::collections::BTreeMap;

use smol_str::SmolStr;

pub use traits::{
    HasAria, HasBackgroundColor, HasBorder, HasDirection, HasId, HasMargin, HasPadding, HasSize,
    HasTextAlign,
};

pub trait FormatBag: Default + Clone + PartialEq {
    /// Shallow override: every key set in `other` replaces the key in `self`.
    fn merge_from(&mut self, other: &Self);

    /// True when no key is set.
    fn is_empty(&self) -> bool;
}

macro_rules! format_bag {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
        $( ; parts { $( $(#[$pmeta:meta])* $part:ident : $pty:ty ),* $(,)? } )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: Option<$ty>, )*
            $($( $(#[$pmeta])* pub $part: $pty, )*)?
        }

        impl FormatBag for $name {
            fn merge_from(&mut self, other: &Self) {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field.clone();
                    }
                )*
                $($( self.$part.merge_from(&other.$part); )*)?
            }

            fn is_empty(&self) -> bool {
                true $( && self.$field.is_none() )* $($( && self.$part.is_empty() )*)?
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ltr" => Some(Self::Ltr),
            "rtl" => Some(Self::Rtl),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// Text alignment stored relative to the writing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Center,
    End,
    Justify,
}

impl TextAlign {
    /// Parse a CSS keyword; `left`/`right` resolve against `direction`.
    pub fn parse(value: &str, direction: Option<Direction>) -> Option<Self> {
        let rtl = direction == Some(Direction::Rtl);
        match value.trim().to_ascii_lowercase().as_str() {
            "start" => Some(Self::Start),
            "end" => Some(Self::End),
            "center" | "middle" => Some(Self::Center),
            "justify" => Some(Self::Justify),
            "left" => Some(if rtl { Self::End } else { Self::Start }),
            "right" => Some(if rtl { Self::Start } else { Self::End }),
            _ => None,
        }
    }

    /// Physical CSS keyword for `direction`.
    pub fn to_css(self, direction: Option<Direction>) -> &'static str {
        let rtl = direction == Some(Direction::Rtl);
        match self {
            Self::Start if rtl => "right",
            Self::Start => "left",
            Self::End if rtl => "left",
            Self::End => "right",
            Self::Center => "center",
            Self::Justify => "justify",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuperOrSubScript {
    Super,
    Sub,
    Baseline,
}

format_bag! {
    /// Four-sided values such as margin or padding, kept as CSS lengths.
    pub struct BoxSides {
        top: SmolStr,
        right: SmolStr,
        bottom: SmolStr,
        left: SmolStr,
    }
}

impl BoxSides {
    pub const SIDES: [&'static str; 4] = ["top", "right", "bottom", "left"];

    pub fn side(&self, side: &str) -> Option<&SmolStr> {
        match side {
            "top" => self.top.as_ref(),
            "right" => self.right.as_ref(),
            "bottom" => self.bottom.as_ref(),
            "left" => self.left.as_ref(),
            _ => None,
        }
    }

    pub fn side_mut(&mut self, side: &str) -> Option<&mut Option<SmolStr>> {
        match side {
            "top" => Some(&mut self.top),
            "right" => Some(&mut self.right),
            "bottom" => Some(&mut self.bottom),
            "left" => Some(&mut self.left),
            _ => None,
        }
    }

    /// The shared value when all four sides are set to the same length.
    pub fn uniform(&self) -> Option<&SmolStr> {
        let top = self.top.as_ref()?;
        [&self.right, &self.bottom, &self.left]
            .iter()
            .all(|side| side.as_ref() == Some(top))
            .then_some(top)
    }
}

format_bag! {
    pub struct BorderFormat {
        top: SmolStr,
        right: SmolStr,
        bottom: SmolStr,
        left: SmolStr,
        radius: SmolStr,
    }
}

impl BorderFormat {
    pub fn side_mut(&mut self, side: &str) -> Option<&mut Option<SmolStr>> {
        match side {
            "top" => Some(&mut self.top),
            "right" => Some(&mut self.right),
            "bottom" => Some(&mut self.bottom),
            "left" => Some(&mut self.left),
            _ => None,
        }
    }

    pub fn side(&self, side: &str) -> Option<&SmolStr> {
        match side {
            "top" => self.top.as_ref(),
            "right" => self.right.as_ref(),
            "bottom" => self.bottom.as_ref(),
            "left" => self.left.as_ref(),
            _ => None,
        }
    }
}

format_bag! {
    pub struct SizeFormat {
        width: SmolStr,
        height: SmolStr,
        min_width: SmolStr,
        max_width: SmolStr,
        min_height: SmolStr,
        max_height: SmolStr,
    }
}

format_bag! {
    pub struct AriaFormat {
        role: SmolStr,
        title: SmolStr,
        described_by: SmolStr,
    }
}

format_bag! {
    /// Inline formatting carried by every segment.
    pub struct SegmentFormat {
        font_family: SmolStr,
        font_size: SmolStr,
        font_weight: SmolStr,
        italic: bool,
        underline: bool,
        strikethrough: bool,
        super_or_sub: SuperOrSubScript,
        text_color: SmolStr,
        background_color: SmolStr,
        letter_spacing: SmolStr,
        line_height: SmolStr,
    }
}

impl SegmentFormat {
    /// Whether `font_weight` renders bold.
    pub fn is_bold(&self) -> bool {
        self.font_weight.as_deref().is_some_and(is_bold_weight)
    }
}

pub(crate) fn is_bold_weight(weight: &str) -> bool {
    match weight.trim() {
        "bold" | "bolder" => true,
        other => other.parse::<u32>().is_ok_and(|w| w >= 600),
    }
}

format_bag! {
    /// Block level formatting of paragraphs, containers and list items.
    pub struct BlockFormat {
        direction: Direction,
        text_align: TextAlign,
        background_color: SmolStr,
        white_space: SmolStr,
        line_height: SmolStr,
        text_indent: SmolStr,
        id: SmolStr,
    };
    parts {
        margin: BoxSides,
        padding: BoxSides,
        border: BorderFormat,
    }
}

impl BlockFormat {
    /// The part of a block format that nested blocks inherit.
    pub fn inheritable(&self) -> BlockFormat {
        BlockFormat {
            direction: self.direction,
            text_align: self.text_align,
            white_space: self.white_space.clone(),
            line_height: self.line_height.clone(),
            ..Default::default()
        }
    }
}

/// List items format their `li` like any block.
pub type ListItemFormat = BlockFormat;

format_bag! {
    /// Format of one list nesting level (`ol`/`ul`).
    pub struct ListLevelFormat {
        direction: Direction,
        text_align: TextAlign,
        start_number: u32,
        list_style_type: SmolStr,
        /// `block` when the item only exists to hold a nested level.
        display_for_dummy_item: SmolStr,
        id: SmolStr,
    };
    parts {
        margin: BoxSides,
        padding: BoxSides,
    }
}

format_bag! {
    pub struct TableFormat {
        id: SmolStr,
        direction: Direction,
        background_color: SmolStr,
        border_collapse: bool,
        table_layout: SmolStr,
        cell_spacing: SmolStr,
    };
    parts {
        margin: BoxSides,
        border: BorderFormat,
        size: SizeFormat,
        aria: AriaFormat,
    }
}

format_bag! {
    pub struct TableCellFormat {
        direction: Direction,
        text_align: TextAlign,
        vertical_align: SmolStr,
        background_color: SmolStr,
        white_space: SmolStr,
    };
    parts {
        padding: BoxSides,
        border: BorderFormat,
    }
}

format_bag! {
    pub struct ImageFormat {
        id: SmolStr,
        alt: SmolStr,
        float: SmolStr,
        vertical_align: SmolStr,
    };
    parts {
        size: SizeFormat,
        margin: BoxSides,
        padding: BoxSides,
        border: BorderFormat,
        aria: AriaFormat,
    }
}

format_bag! {
    pub struct LinkFormat {
        href: SmolStr,
        target: SmolStr,
        rel: SmolStr,
        name: SmolStr,
        id: SmolStr,
        class_name: SmolStr,
    };
    parts {
        aria: AriaFormat,
    }
}

format_bag! {
    pub struct CodeFormat {
        font_family: SmolStr,
    }
}

format_bag! {
    /// Identity of an entity, stored on its wrapper as class name tokens.
    pub struct EntityInfoFormat {
        entity_type: SmolStr,
        id: SmolStr,
        is_readonly: bool,
        /// Wrapper carried no entity tokens and was recognized by
        /// `contenteditable="false"` alone.
        is_fake_entity: bool,
    }
}

/// `data-*` attributes of an element, without the `data-` prefix.
pub type Dataset = BTreeMap<SmolStr, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_shallow_override() {
        let mut base = SegmentFormat {
            font_size: Some("10pt".into()),
            italic: Some(true),
            ..Default::default()
        };
        let over = SegmentFormat {
            font_size: Some("12pt".into()),
            underline: Some(true),
            ..Default::default()
        };
        base.merge_from(&over);
        assert_eq!(base.font_size.as_deref(), Some("12pt"));
        assert_eq!(base.italic, Some(true));
        assert_eq!(base.underline, Some(true));
    }

    #[test]
    fn test_parts_merge_and_emptiness() {
        let mut block = BlockFormat::default();
        assert!(block.is_empty());
        let other = BlockFormat {
            margin: BoxSides {
                left: Some("40px".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        block.merge_from(&other);
        assert!(!block.is_empty());
        assert_eq!(block.margin.left.as_deref(), Some("40px"));
        assert_eq!(block.margin.top, None);
    }

    #[test]
    fn test_text_align_is_direction_relative() {
        assert_eq!(TextAlign::parse("left", None), Some(TextAlign::Start));
        assert_eq!(
            TextAlign::parse("left", Some(Direction::Rtl)),
            Some(TextAlign::End)
        );
        assert_eq!(TextAlign::End.to_css(Some(Direction::Rtl)), "left");
        assert_eq!(TextAlign::Start.to_css(Some(Direction::Ltr)), "left");
    }

    #[test]
    fn test_bold_weights() {
        assert!(is_bold_weight("bold"));
        assert!(is_bold_weight("700"));
        assert!(!is_bold_weight("normal"));
        assert!(!is_bold_weight("400"));
    }

    #[test]
    fn test_uniform_sides() {
        let sides = BoxSides {
            top: Some("4px".into()),
            right: Some("4px".into()),
            bottom: Some("4px".into()),
            left: Some("4px".into()),
        };
        assert_eq!(sides.uniform().map(|s| s.as_str()), Some("4px"));
        let uneven = BoxSides {
            left: Some("2px".into()),
            ..sides
        };
        assert_eq!(uneven.uniform(), None);
    }
}
