//! Comma-separated menu id lists.
//!
//! Favorite lists, records, and a user's favorite menus all reference catalog
//! menus as a string like `"9,9,10"`. The encoding is ordered and duplicates are
//! meaningful: an id repeated N times means N servings of that menu.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// A parsed id list. Order and multiplicity are preserved exactly as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdList(Vec<i64>);

impl IdList {
    /// Parse an encoded list. Tokens are not trimmed, so `"9, 10"` is rejected.
    /// The empty string is the empty list.
    pub fn parse(encoded: &str) -> Result<Self> {
        if encoded.is_empty() {
            return Ok(Self::default());
        }
        encoded
            .split(',')
            .map(|token| {
                token.parse::<i64>().map_err(|_| {
                    Error::InvalidInput(format!("token '{token}' in \"{encoded}\" is not an id"))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn ids(&self) -> &[i64] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.0.contains(&id)
    }

    #[must_use]
    pub fn count_of(&self, id: i64) -> usize {
        self.0.iter().filter(|&&x| x == id).count()
    }

    /// Distinct ids in order of first appearance, each with its multiplicity.
    #[must_use]
    pub fn quantities(&self) -> Vec<(i64, usize)> {
        let mut out: Vec<(i64, usize)> = Vec::new();
        let mut index: HashMap<i64, usize> = HashMap::new();
        for &id in &self.0 {
            if let Some(&pos) = index.get(&id) {
                out[pos].1 += 1;
            } else {
                index.insert(id, out.len());
                out.push((id, 1));
            }
        }
        out
    }
}

impl From<Vec<i64>> for IdList {
    fn from(ids: Vec<i64>) -> Self {
        Self(ids)
    }
}

impl fmt::Display for IdList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// The rewritten list. Identical to the input when nothing matched.
    pub encoded: String,
    /// How many occurrences of the old id were removed.
    pub matched: usize,
}

impl Reconciliation {
    /// Nothing matched, so there is nothing to persist.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.matched == 0
    }
}

/// Remove every occurrence of `old_id` from an encoded list, optionally appending the
/// same number of copies of `new_id`.
///
/// All matching positions are removed, adjacent or not. The remaining ids keep their
/// relative order and replacements always go at the end. A `new_id` of `Some(0)` is
/// treated like `None`.
///
/// A token that is not an integer fails the whole call with [`Error::InvalidInput`].
pub fn reconcile(encoded: &str, old_id: i64, new_id: Option<i64>) -> Result<Reconciliation> {
    let IdList(ids) = IdList::parse(encoded)?;

    let (matched, mut kept): (Vec<i64>, Vec<i64>) =
        ids.into_iter().partition(|&id| id == old_id);
    let count = matched.len();

    if count == 0 {
        return Ok(Reconciliation {
            encoded: encoded.to_string(),
            matched: 0,
        });
    }

    if let Some(new_id) = new_id.filter(|&id| id != 0) {
        kept.extend(std::iter::repeat_n(new_id, count));
    }

    Ok(Reconciliation {
        encoded: IdList(kept).to_string(),
        matched: count,
    })
}
