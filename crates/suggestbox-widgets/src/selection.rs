//! The ordered list of chosen items shown as chips.

use crate::item::Item;

/// Items the user has chosen, in the order they were chosen.
///
/// Duplicates are allowed; removal is last-in first-out.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionList<I> {
    items: Vec<I>,
}

impl<I> Default for SelectionList<I> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<I: Item> SelectionList<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: I) {
        self.items.push(item);
    }

    /// Remove and return the most recently chosen item.
    pub fn pop(&mut self) -> Option<I> {
        self.items.pop()
    }

    pub fn items(&self) -> &[I] {
        &self.items
    }

    /// Chip labels in selection order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|item| item.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let mut s = SelectionList::new();
        s.push("item1");
        s.push("item3");
        assert_eq!(s.labels().collect::<Vec<_>>(), vec!["item1", "item3"]);
    }

    #[test]
    fn pop_is_lifo() {
        let mut s = SelectionList::new();
        s.push("a");
        s.push("b");
        assert_eq!(s.pop(), Some("b"));
        assert_eq!(s.pop(), Some("a"));
        assert_eq!(s.pop(), None);
    }

    #[test]
    fn duplicates_are_allowed() {
        let mut s = SelectionList::new();
        s.push("a");
        s.push("a");
        assert_eq!(s.items().len(), 2);
        assert_eq!(s.labels().collect::<Vec<_>>(), vec!["a", "a"]);
    }
}
