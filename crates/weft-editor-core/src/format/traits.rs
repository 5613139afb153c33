//! Accessor traits shared by format categories.
//!
//! The common handlers (direction, margin, border, ...) are generic over
//! these so one parser/applier pair serves every bag that has the field.

use smol_str::SmolStr;

use super::{
    AriaFormat, BlockFormat, BorderFormat, BoxSides, Direction, ImageFormat, LinkFormat,
    ListLevelFormat, SegmentFormat, SizeFormat, TableCellFormat, TableFormat, TextAlign,
};

macro_rules! accessor_trait {
    ($trait_name:ident, $get:ident, $get_mut:ident, $ty:ty) => {
        pub trait $trait_name {
            fn $get(&self) -> &$ty;
            fn $get_mut(&mut self) -> &mut $ty;
        }
    };
}

macro_rules! impl_accessor {
    ($trait_name:ident, $get:ident, $get_mut:ident, $ty:ty, $field:ident => $($bag:ty),+) => {
        $(
            impl $trait_name for $bag {
                fn $get(&self) -> &$ty {
                    &self.$field
                }
                fn $get_mut(&mut self) -> &mut $ty {
                    &mut self.$field
                }
            }
        )+
    };
}

accessor_trait!(HasDirection, direction, direction_mut, Option<Direction>);
accessor_trait!(HasTextAlign, text_align, text_align_mut, Option<TextAlign>);
accessor_trait!(HasBackgroundColor, background_color, background_color_mut, Option<SmolStr>);
accessor_trait!(HasMargin, margin, margin_mut, BoxSides);
accessor_trait!(HasPadding, padding, padding_mut, BoxSides);
accessor_trait!(HasBorder, border, border_mut, BorderFormat);
accessor_trait!(HasSize, size, size_mut, SizeFormat);
accessor_trait!(HasId, id, id_mut, Option<SmolStr>);
accessor_trait!(HasAria, aria, aria_mut, AriaFormat);

impl_accessor!(HasDirection, direction, direction_mut, Option<Direction>, direction =>
    BlockFormat, ListLevelFormat, TableFormat, TableCellFormat);
impl_accessor!(HasTextAlign, text_align, text_align_mut, Option<TextAlign>, text_align =>
    BlockFormat, ListLevelFormat, TableCellFormat);
impl_accessor!(HasBackgroundColor, background_color, background_color_mut, Option<SmolStr>, background_color =>
    SegmentFormat, BlockFormat, TableFormat, TableCellFormat);
impl_accessor!(HasMargin, margin, margin_mut, BoxSides, margin =>
    BlockFormat, ListLevelFormat, TableFormat, ImageFormat);
impl_accessor!(HasPadding, padding, padding_mut, BoxSides, padding =>
    BlockFormat, ListLevelFormat, TableCellFormat, ImageFormat);
impl_accessor!(HasBorder, border, border_mut, BorderFormat, border =>
    BlockFormat, TableFormat, TableCellFormat, ImageFormat);
impl_accessor!(HasSize, size, size_mut, SizeFormat, size =>
    TableFormat, ImageFormat);
impl_accessor!(HasId, id, id_mut, Option<SmolStr>, id =>
    BlockFormat, ListLevelFormat, TableFormat, ImageFormat, LinkFormat);
impl_accessor!(HasAria, aria, aria_mut, AriaFormat, aria =>
    TableFormat, ImageFormat, LinkFormat);
