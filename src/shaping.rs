//! Right-to-left text preparation.
//!
//! The glyph renderer draws characters left to right, one codepoint at a
//! time. Arabic needs two passes before that works: letters are replaced by
//! their contextual presentation forms (initial, medial, final, isolated),
//! then the line is reordered from logical to visual order.

use std::borrow::Cow;

use ar_reshaper::reshape_line;
use unicode_bidi::BidiInfo;
use unicode_bidi_mirroring::get_mirrored;

/// Reshape, then reorder for display. Text without any right-to-left
/// character comes back unchanged.
pub fn shape(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let reshaped = reshape_line(text);
    visual_order(&reshaped).into_owned()
}

/// Bidi reordering of each paragraph, paragraphs kept in order. Characters
/// of right-to-left runs are mirrored, so that a closing bracket drawn on
/// the left of an Arabic word opens it.
fn visual_order(text: &str) -> Cow<'_, str> {
    let info = BidiInfo::new(text, None);
    if !info.has_rtl() {
        return Cow::Borrowed(text);
    }
    let mut visual = String::with_capacity(text.len());
    for paragraph in &info.paragraphs {
        let (levels, runs) = info.visual_runs(paragraph, paragraph.range.clone());
        for run in runs {
            let chars = info.text[run.clone()].chars();
            if levels[run.start].is_rtl() {
                visual.extend(chars.rev().map(mirrored));
            } else {
                visual.extend(chars);
            }
        }
    }
    Cow::Owned(visual)
}

fn mirrored(c: char) -> char {
    get_mirrored(c).unwrap_or(c)
}
