use serde::{Serialize, Serializer};
use std::{collections::HashSet, hash::Hash, sync::Arc};

/// A set that remembers the order in which values were first inserted.
///
/// Iteration and serialization follow first-seen order, so output built from a single pass
/// over the feed is deterministic.
#[derive(Debug, Clone)]
pub struct OrderedSet<T> {
    seen: HashSet<T>,
    items: Vec<T>,
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self {
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }
}

impl<T> OrderedSet<T>
where
    T: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns `false` when the value was already present.
    pub fn insert(&mut self, value: T) -> bool {
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value);
        true
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl OrderedSet<Arc<str>> {
    pub fn to_strings(&self) -> Vec<String> {
        self.items.iter().map(|value| value.to_string()).collect()
    }
}

impl<T> FromIterator<T> for OrderedSet<T>
where
    T: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        iter.into_iter().for_each(|value| {
            set.insert(value);
        });
        set
    }
}

impl<T: Serialize> Serialize for OrderedSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

#[test]
fn keeps_first_seen_order() {
    let set: OrderedSet<&str> = ["c", "a", "c", "b", "a"].into_iter().collect();
    assert_eq!(set.as_slice(), &["c", "a", "b"]);
}

#[test]
fn insert_reports_duplicates() {
    let mut set = OrderedSet::new();
    assert!(set.insert(1));
    assert!(!set.insert(1));
    assert_eq!(set.as_slice(), &[1]);
}
