//! Edit intents.
//!
//! The core never changes content. For an insertion or deletion it proposes
//! which span the host should replace and where the caret should land
//! afterwards; the host applies the edit and re-renders.

use crate::point::Point;
use crate::range::Range;
use crate::registry::Scope;
use crate::tree::NativeTree;

/// Span to replace and the caret to restore once the host has replaced it.
#[derive(Debug, Clone, PartialEq)]
pub struct EditIntent<N> {
    pub replace: Range<N>,
    pub after: Range<N>,
}

/// Intent for inserting `text` over `selection`.
///
/// The selection is replaced; the caret lands `text`'s length in characters
/// past the start.
pub fn insertion_intent<T>(
    scope: Scope<'_, T>,
    selection: &Range<T::Node>,
    text: &str,
) -> EditIntent<T::Node>
where
    T: NativeTree,
{
    let start = selection.start();
    let inserted = isize::try_from(text.chars().count()).unwrap_or(isize::MAX);
    let after = start.steps_away(scope, inserted);
    EditIntent {
        replace: Range::new(scope, start.clone(), selection.end().clone()),
        after: Range::collapsed(after),
    }
}

/// Intent for a backward delete over `selection`.
///
/// A caret deletes the character before it, which may belong to the
/// previous region; an expanded selection deletes itself.
pub fn deletion_intent<T>(scope: Scope<'_, T>, selection: &Range<T::Node>) -> EditIntent<T::Node>
where
    T: NativeTree,
{
    let start = selection.start();
    let end = selection.end();
    let replace_start: Point<T::Node> = if start == end {
        start.steps_away(scope, -1)
    } else {
        start.clone()
    };
    EditIntent {
        replace: Range::new(scope, replace_start.clone(), end.clone()),
        after: Range::collapsed(replace_start),
    }
}
