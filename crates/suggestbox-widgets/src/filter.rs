//! Default search used when no custom supplier is configured.
//!
//! A plain case-insensitive substring match over the item labels.  Original
//! order is kept; there is no ranking.

use crate::item::Item;

/// Whether `label` contains `query`, ignoring case.  An empty query matches.
pub fn matches(label: &str, query: &str) -> bool {
    query.is_empty() || label.to_lowercase().contains(&query.to_lowercase())
}

/// Items whose label contains `query`, in their original order.
pub fn filter_items<I: Item>(items: &[I], query: &str) -> Vec<I> {
    items
        .iter()
        .filter(|item| matches(item.label(), query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Named;

    fn named(names: &[&str]) -> Vec<Named> {
        names.iter().map(|n| Named::new(*n)).collect()
    }

    #[test]
    fn empty_query_keeps_everything() {
        let items = named(&["aaa", "bbb", "ccc"]);
        assert_eq!(filter_items(&items, ""), items);
    }

    #[test]
    fn substring_match_keeps_order() {
        let items = named(&["aaa", "aab", "abc"]);
        let labels: Vec<_> = filter_items(&items, "b")
            .into_iter()
            .map(|n| n.name)
            .collect();
        assert_eq!(labels, vec!["aab", "abc"]);
    }

    #[test]
    fn case_is_ignored() {
        let items = vec!["Apple", "banana", "APRICOT"];
        assert_eq!(filter_items(&items, "ap"), vec!["Apple", "APRICOT"]);
        assert!(matches("Grape", "APE"));
    }

    #[test]
    fn no_match_is_empty() {
        let items = named(&["aaa", "bbb", "ccc"]);
        assert!(filter_items(&items, "d").is_empty());
    }

    #[test]
    fn multibyte_labels() {
        let items = vec!["Café", "naïve", "résumé"];
        assert_eq!(filter_items(&items, "É"), vec!["Café", "résumé"]);
    }
}
