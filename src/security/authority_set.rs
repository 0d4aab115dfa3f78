use std::collections::HashSet;

use serde::{Serialize, Serializer};

/// Insertion-ordered set of authority strings.
///
/// Duplicates collapse to the first occurrence, so iteration order is
/// deterministic for a given sequence of inserts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthoritySet {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl AuthoritySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the authority was already present.
    pub fn insert(&mut self, authority: impl Into<String>) -> bool {
        let authority = authority.into();
        if self.seen.contains(&authority) {
            return false;
        }
        self.seen.insert(authority.clone());
        self.ordered.push(authority);
        true
    }

    pub fn contains(&self, authority: &str) -> bool {
        self.seen.contains(authority)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl Extend<String> for AuthoritySet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for authority in iter {
            self.insert(authority);
        }
    }
}

impl FromIterator<String> for AuthoritySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for AuthoritySet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.into_iter()
    }
}

impl Serialize for AuthoritySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
