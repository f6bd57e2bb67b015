//! Small pure text helpers.

/// Display column of `caret_offset` within `text`, expanding tabs.
///
/// - `caret_offset` is a character index, clamped to the length of `text`.
/// - A tab advances to the next multiple of `tab_width`; from a multiple it
///   advances by a full `tab_width`.
/// - A `tab_width` of 0 is treated as 1.
///
/// The result is 0-based.
#[must_use]
pub fn display_column(text: &str, caret_offset: usize, tab_width: u32) -> u32 {
    let width = tab_width.max(1);
    let mut column: u32 = 0;
    for ch in text.chars().take(caret_offset) {
        if ch == '\t' {
            column += width - column % width;
        } else {
            column += 1;
        }
    }
    column
}
