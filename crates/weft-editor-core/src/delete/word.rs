//! Ctrl+Backspace and Ctrl+Delete.
//!
//! The text run next to the caret is read grapheme by grapheme in the
//! deletion direction. Backward deletion eats the spaces next to the caret
//! and then one run of word characters or punctuation. Forward deletion
//! eats one run and the spaces that follow it.

use unicode_segmentation::UnicodeSegmentation;

use super::segment::remove_graphemes;
use super::{DeleteContext, DeleteDirection, DeleteResult};
use crate::model::{ContentModelDocument, Paragraph, paragraph_at_mut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Space,
    Punctuation,
    Word,
}

fn class_of(grapheme: &str) -> CharClass {
    match grapheme.chars().next() {
        Some(c) if c.is_whitespace() => CharClass::Space,
        Some(c) if c.is_alphanumeric() || c == '_' => CharClass::Word,
        _ => CharClass::Punctuation,
    }
}

pub fn forward_delete_word(model: &mut ContentModelDocument, ctx: &mut DeleteContext<'_>) {
    delete_word(model, ctx, DeleteDirection::Forward);
}

pub fn backward_delete_word(model: &mut ContentModelDocument, ctx: &mut DeleteContext<'_>) {
    delete_word(model, ctx, DeleteDirection::Backward);
}

fn delete_word(
    model: &mut ContentModelDocument,
    ctx: &mut DeleteContext<'_>,
    direction: DeleteDirection,
) {
    if ctx.delete_result != DeleteResult::NotDeleted {
        return;
    }
    let Some(paragraph) = paragraph_at_mut(model, &ctx.insert_point.path) else {
        return;
    };
    let Some(marker) = paragraph.marker_index() else {
        return;
    };
    let run = text_run(paragraph, marker, direction);
    let classes: Vec<CharClass> = run
        .iter()
        .flat_map(|&index| {
            let text = paragraph.segments[index].as_text().unwrap_or_default();
            let graphemes: Vec<&str> = text.graphemes(true).collect();
            let ordered: Vec<CharClass> = match direction {
                DeleteDirection::Forward => graphemes.iter().map(|g| class_of(g)).collect(),
                DeleteDirection::Backward => graphemes.iter().rev().map(|g| class_of(g)).collect(),
            };
            ordered
        })
        .collect();
    let count = word_length(&classes, direction);
    if count == 0 {
        return;
    }

    let mut left = count;
    for &index in &run {
        if left == 0 {
            break;
        }
        if let Some(text) = paragraph.segments[index].as_text_mut() {
            left -= remove_graphemes(text, left, direction);
        }
    }
    paragraph
        .segments
        .retain(|s| s.as_text().is_none_or(|t| !t.is_empty()));
    paragraph.cached_element = None;
    ctx.delete_result = DeleteResult::Range;
    tracing::debug!(target: "weft::delete", ?direction, count, "deleted word");
    ctx.refresh_insert_point(model);
}

/// Indices of the text segments touching the caret, nearest first.
fn text_run(paragraph: &Paragraph, marker: usize, direction: DeleteDirection) -> Vec<usize> {
    let is_text = |i: &usize| paragraph.segments[*i].as_text().is_some();
    match direction {
        DeleteDirection::Forward => (marker + 1..paragraph.segments.len())
            .take_while(is_text)
            .collect(),
        DeleteDirection::Backward => (0..marker).rev().take_while(is_text).collect(),
    }
}

/// How many graphemes, read from the caret outward, one word deletion
/// removes.
fn word_length(classes: &[CharClass], direction: DeleteDirection) -> usize {
    let run_of = |from: usize, class: CharClass| {
        classes[from..].iter().take_while(|c| **c == class).count()
    };
    match direction {
        DeleteDirection::Backward => {
            let spaces = run_of(0, CharClass::Space);
            match classes.get(spaces) {
                Some(&class) => spaces + run_of(spaces, class),
                None => spaces,
            }
        }
        DeleteDirection::Forward => {
            let Some(&first) = classes.first() else {
                return 0;
            };
            let word = run_of(0, first);
            if first == CharClass::Space {
                word
            } else {
                word + run_of(word, CharClass::Space)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CharClass::*;

    fn classes(text: &str) -> Vec<CharClass> {
        text.graphemes(true).map(class_of).collect()
    }

    #[test]
    fn test_word_length_backward() {
        let mut read: Vec<CharClass> = classes("hello world  ");
        read.reverse();
        assert_eq!(word_length(&read, DeleteDirection::Backward), 7);
        let mut read = classes("end...");
        read.reverse();
        assert_eq!(word_length(&read, DeleteDirection::Backward), 3);
        assert_eq!(word_length(&[], DeleteDirection::Backward), 0);
    }

    #[test]
    fn test_word_length_forward() {
        assert_eq!(word_length(&classes("foo bar"), DeleteDirection::Forward), 4);
        assert_eq!(word_length(&classes("  bar"), DeleteDirection::Forward), 2);
        assert_eq!(word_length(&[Word, Punctuation], DeleteDirection::Forward), 1);
    }
}
