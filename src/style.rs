//! Fixed presentation values used by the formatting passes.
//!
//! Every builder returns an owned value; styles are cloned into each cell
//! rather than shared by reference, so later edits can never alias.

use umya_spreadsheet::{
    Alignment, Border, Fill, Font, HorizontalAlignmentValues, Style,
    VerticalAlignmentValues,
};

pub const YELLOW: &str = "FFFF00";
pub const GREEN: &str = "00B050";
pub const RED: &str = "FF0000";
pub const LIGHT_GREEN: &str = "00FF00";

const FONT_NAME: &str = "Arial";

pub fn font_12_bold() -> Font {
    let mut font = Font::default();
    font.set_name(FONT_NAME).set_size(12.0).set_bold(true);
    font
}

pub fn font_14_bold() -> Font {
    let mut font = Font::default();
    font.set_name(FONT_NAME).set_size(14.0).set_bold(true);
    font
}

pub fn align_left() -> Alignment {
    let mut alignment = Alignment::default();
    alignment.set_horizontal(HorizontalAlignmentValues::Left);
    alignment.set_vertical(VerticalAlignmentValues::Center);
    alignment
}

pub fn align_right() -> Alignment {
    let mut alignment = Alignment::default();
    alignment.set_horizontal(HorizontalAlignmentValues::Right);
    alignment.set_vertical(VerticalAlignmentValues::Center);
    alignment
}

pub fn align_center() -> Alignment {
    let mut alignment = Alignment::default();
    alignment.set_horizontal(HorizontalAlignmentValues::Center);
    alignment.set_vertical(VerticalAlignmentValues::Center);
    alignment
}

/// Stamps a cell style with the bold-on-yellow presentation used by the
/// spot sheet and splice destinations.
pub fn apply_highlight(style: &mut Style, font: Font, alignment: Alignment) {
    style.set_font(font);
    style.set_alignment(alignment);
    style.set_background_color(YELLOW);
}

pub fn set_thin_border(style: &mut Style) {
    let borders = style.get_borders_mut();
    borders
        .get_left_border_mut()
        .set_border_style(Border::BORDER_THIN);
    borders
        .get_right_border_mut()
        .set_border_style(Border::BORDER_THIN);
    borders
        .get_top_border_mut()
        .set_border_style(Border::BORDER_THIN);
    borders
        .get_bottom_border_mut()
        .set_border_style(Border::BORDER_THIN);
}

pub fn clear_border(style: &mut Style) {
    let borders = style.get_borders_mut();
    borders
        .get_left_border_mut()
        .set_border_style(Border::BORDER_NONE);
    borders
        .get_right_border_mut()
        .set_border_style(Border::BORDER_NONE);
    borders
        .get_top_border_mut()
        .set_border_style(Border::BORDER_NONE);
    borders
        .get_bottom_border_mut()
        .set_border_style(Border::BORDER_NONE);
}

pub fn clear_fill(style: &mut Style) {
    style.set_fill(Fill::default());
}
