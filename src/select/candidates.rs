//! The candidate collection and its live filter.
//!
//! Filtering is a pure recomputation: every call walks the full candidate
//! list and returns a fresh view. Nothing is cached between calls.

use std::collections::HashSet;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use super::item::{Item, ItemKey};

/// Read-only universe of selectable items.
#[derive(Debug, Clone)]
pub struct CandidateList<T> {
    items: Vec<Item<T>>,
}

impl<T> CandidateList<T> {
    /// Wrap a candidate collection.
    ///
    /// Keys must be unique. This is the caller's precondition and is only
    /// checked in debug builds.
    pub fn new(items: Vec<Item<T>>) -> Self {
        debug_assert!(
            has_unique_keys(&items),
            "candidate collection contains duplicate keys"
        );
        Self { items }
    }

    /// All candidates in their original order.
    pub fn items(&self) -> &[Item<T>] {
        &self.items
    }

    /// Look up a candidate by key.
    pub fn get(&self, key: &ItemKey) -> Option<&Item<T>> {
        self.items.iter().find(|item| &item.key == key)
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if there are no candidates at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Candidates matching `filter_text` that are not in `excluded`.
    ///
    /// Matching is a substring test that ignores case and accents; an empty
    /// filter matches everything. The result may be empty but is always a
    /// valid list.
    pub fn recompute<'a>(
        &'a self,
        filter_text: &str,
        excluded: &HashSet<ItemKey>,
    ) -> Vec<&'a Item<T>> {
        self.matching_indices(filter_text, excluded)
            .into_iter()
            .map(|idx| &self.items[idx])
            .collect()
    }

    /// Same as [`recompute`](Self::recompute) but yields indices into
    /// [`items`](Self::items).
    pub fn matching_indices(&self, filter_text: &str, excluded: &HashSet<ItemKey>) -> Vec<usize> {
        let needle = fold(filter_text);
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !excluded.contains(&item.key))
            .filter(|(_, item)| needle.is_empty() || fold(&item.text).contains(&needle))
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Fold `text` for matching: decompose, drop combining marks, lowercase.
/// "Équipe" and "EQUIPE" both fold to "equipe".
fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Check that no two items share a key.
pub fn has_unique_keys<T>(items: &[Item<T>]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().all(|item| seen.insert(&item.key))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn colors() -> CandidateList<()> {
        CandidateList::new(vec![
            Item::plain(1u32, "Red"),
            Item::plain(2u32, "Green"),
            Item::plain(3u32, "Blue"),
        ])
    }

    fn texts(items: &[&Item<()>]) -> Vec<String> {
        items.iter().map(|i| i.text.clone()).collect()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let list = colors();
        let view = list.recompute("", &HashSet::new());
        assert_eq!(texts(&view), vec!["Red", "Green", "Blue"]);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let list = CandidateList::new(vec![Item::plain("a", "Alpha Team")]);
        let none = HashSet::new();
        assert_eq!(list.recompute("alp", &none).len(), 1);
        assert_eq!(list.recompute("TEAM", &none).len(), 1);
        assert_eq!(list.recompute("", &none).len(), 1);
        assert!(list.recompute("zzz", &none).is_empty());
    }

    #[test]
    fn test_accents_and_case_are_ignored() {
        let list = CandidateList::new(vec![Item::plain("e", "Équipe")]);
        let none = HashSet::new();
        assert_eq!(list.recompute("equipe", &none).len(), 1);
        assert_eq!(list.recompute("EQUIPE", &none).len(), 1);
        assert_eq!(list.recompute("équ", &none).len(), 1);
        assert!(list.recompute("equipes", &none).is_empty());
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("Crème Brûlée"), "creme brulee");
        assert_eq!(fold("naïve"), fold("NAIVE"));
    }

    #[test]
    fn test_excluded_keys_are_dropped() {
        let list = colors();
        let excluded: HashSet<ItemKey> = [ItemKey::from(1u32)].into_iter().collect();
        let view = list.recompute("", &excluded);
        assert_eq!(texts(&view), vec!["Green", "Blue"]);
    }

    #[test]
    fn test_filter_and_exclusion_combine() {
        let list = colors();
        let excluded: HashSet<ItemKey> = [ItemKey::from(1u32)].into_iter().collect();
        assert_eq!(texts(&list.recompute("re", &excluded)), vec!["Green"]);
    }

    #[test]
    fn test_recompute_does_not_mutate_candidates() {
        let list = colors();
        let excluded: HashSet<ItemKey> = [ItemKey::from(2u32)].into_iter().collect();
        let _ = list.recompute("bl", &excluded);
        assert_eq!(list.len(), 3);
        assert!(list.get(&ItemKey::from(2u32)).is_some());
    }

    #[test]
    fn test_has_unique_keys() {
        assert!(has_unique_keys(&[Item::plain("a", "A"), Item::plain("b", "B")]));
        assert!(!has_unique_keys(&[Item::plain("a", "A"), Item::plain("a", "B")]));
    }

    #[test]
    fn test_no_match_is_empty_not_missing() {
        let list = colors();
        let view = list.recompute("purple", &HashSet::new());
        assert!(view.is_empty());
    }
}
