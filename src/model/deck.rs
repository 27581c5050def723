//! Deck snapshot and bounded cursor

use super::types::Release;

/// An ordered snapshot of releases plus the cursor over it.
///
/// The snapshot is captured once from the provider and never mutated in
/// place. The cursor satisfies `0 <= cursor < len` whenever `len > 0`:
/// advancing past the last item wraps to 0, retreating below 0 is clamped.
#[derive(Clone, Debug, Default)]
pub struct Deck {
    items: Vec<Release>,
    cursor: usize,
}

impl Deck {
    pub fn new(items: Vec<Release>) -> Self {
        Self { items, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The currently displayed release, if any.
    pub fn active(&self) -> Option<&Release> {
        self.items.get(self.cursor)
    }

    /// The release previewed behind the active card. `None` at the last
    /// index: the preview does not wrap even though `advance` does.
    pub fn upcoming(&self) -> Option<&Release> {
        self.items.get(self.cursor + 1)
    }

    pub fn get(&self, index: usize) -> Option<&Release> {
        self.items.get(index)
    }

    /// Move forward one card, wrapping to the first card past the end.
    pub fn advance(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.items.len();
    }

    /// Move back one card. Returns `false` when already at the first card,
    /// in which case the cursor is unchanged.
    pub fn retreat(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }
}
