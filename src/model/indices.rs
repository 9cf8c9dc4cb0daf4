//! Ambient indices carried from enclosing repeating groups

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Ordered queue of ambient indices, consumed strictly left to right.
///
/// One index is taken for every collection segment that has no literal index.
/// Once a literal index fires, [`IndexContext::discard`] drops everything that
/// is left for the rest of the resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexContext {
    indices: SmallVec<[usize; 4]>,
}

impl IndexContext {
    /// Context with no ambient indices
    pub fn empty() -> Self {
        Self::default()
    }

    /// Context from a slice of indices, outermost group first
    pub fn new(indices: &[usize]) -> Self {
        Self {
            indices: SmallVec::from_slice(indices),
        }
    }

    /// Remaining indices, front first
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Number of remaining indices
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True when no index is left
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Take the front index
    pub fn next_index(&mut self) -> Option<usize> {
        if self.indices.is_empty() {
            None
        } else {
            Some(self.indices.remove(0))
        }
    }

    /// Drop every remaining index
    pub fn discard(&mut self) {
        self.indices.clear();
    }

    /// New context for a row nested one level deeper
    pub fn with_row(&self, row: usize) -> Self {
        let mut indices = self.indices.clone();
        indices.push(row);
        Self { indices }
    }
}

impl From<&[usize]> for IndexContext {
    fn from(indices: &[usize]) -> Self {
        Self::new(indices)
    }
}

impl From<Vec<usize>> for IndexContext {
    fn from(indices: Vec<usize>) -> Self {
        Self {
            indices: SmallVec::from_vec(indices),
        }
    }
}

impl<const N: usize> From<[usize; N]> for IndexContext {
    fn from(indices: [usize; N]) -> Self {
        Self::new(&indices)
    }
}

impl FromIterator<usize> for IndexContext {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for IndexContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, index) in self.indices.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{index}")?;
        }
        f.write_str("]")
    }
}
