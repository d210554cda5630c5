//! Dataset abstraction consumed by graph learning code.

use crate::error::DatasetError;

/// Read-only, indexable collection of graph items.
///
/// Implementations are populated exactly once by their `build` constructor;
/// an unbuilt dataset is not observable. Accessors never mutate, so calling
/// [`Dataset::item_at`] repeatedly with the same index yields the same data.
///
/// # Examples
/// ```
/// use graphset_core::{Dataset, DatasetError};
///
/// struct Squares(Vec<u32>);
///
/// impl Dataset for Squares {
///     type Item<'a> = u32;
///     fn name(&self) -> &str { "squares" }
///     fn len(&self) -> usize { self.0.len() }
///     fn item_at(&self, index: usize) -> Result<u32, DatasetError> {
///         self.0
///             .get(index)
///             .map(|value| value * value)
///             .ok_or(DatasetError::OutOfBounds { index, len: self.len() })
///     }
/// }
///
/// let squares = Squares(vec![1, 2, 3]);
/// assert_eq!(squares.len(), 3);
/// assert_eq!(squares.item_at(2)?, 9);
/// assert!(squares.item_at(3).is_err());
/// # Ok::<(), DatasetError>(())
/// ```
pub trait Dataset {
    /// Item handed out by [`Dataset::item_at`].
    type Item<'a>
    where
        Self: 'a;

    /// Returns a human-readable name.
    fn name(&self) -> &str;

    /// Returns the number of items.
    fn len(&self) -> usize;

    /// Returns whether the dataset contains no items.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the item at `index`.
    ///
    /// # Errors
    /// Returns [`DatasetError::OutOfBounds`] when `index >= self.len()`.
    fn item_at(&self, index: usize) -> Result<Self::Item<'_>, DatasetError>;
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<(), DatasetError> {
    if index < len {
        Ok(())
    } else {
        Err(DatasetError::OutOfBounds { index, len })
    }
}
