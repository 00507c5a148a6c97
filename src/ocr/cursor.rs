use crate::ocr::document::BoundingBox;

/// One tier of the recognition hierarchy, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Block,
    Paragraph,
    Line,
    Word,
}

/// Flat, word-granular position over a recognized page.
///
/// This is the traversal protocol engines expose; `DocumentBuilder` turns it
/// back into a tree. A cursor is positioned on one word at a time and can
/// report on the enclosing elements at every level.
pub trait PageCursor {
    /// Positions on the first word. Returns false if the page has none.
    fn begin(&mut self) -> bool;

    /// Text of the current word.
    fn word_text(&self) -> String;

    /// Box of the element at `level` that contains the current word, if the
    /// engine could localize it.
    fn bounding_box(&self, level: Level) -> Option<BoundingBox>;

    /// True if the current element at `child` level is the last child of its
    /// enclosing element at `parent` level.
    fn is_final_of(&self, parent: Level, child: Level) -> bool;

    /// Moves to the first word of the next element at `level`.
    /// Returns false once the page is exhausted.
    fn advance(&mut self, level: Level) -> bool;

    /// Mean confidence of the whole page, captured once.
    fn mean_confidence(&self) -> f32;
}
