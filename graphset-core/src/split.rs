//! Train/validation/test split masks.
//!
//! Splits are contiguous by node order: the first `floor(train * N)` nodes
//! train, the next `floor(val * N)` validate, and the remainder test. The
//! split is not shuffled; callers wanting a randomised split
//! must permute node identifiers before building the graph.

use crate::error::SplitError;

/// Fractions of nodes assigned to the train and validation splits.
///
/// The test split receives whatever remains.
///
/// # Examples
/// ```
/// use graphset_core::SplitRatios;
///
/// let counts = SplitRatios::default().counts(34)?;
/// assert_eq!((counts.train, counts.val, counts.test), (20, 6, 8));
/// # Ok::<(), graphset_core::SplitError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitRatios {
    /// Fraction of nodes in the train split.
    pub train: f64,
    /// Fraction of nodes in the validation split.
    pub val: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.6,
            val: 0.2,
        }
    }
}

impl SplitRatios {
    /// Checks both ratios lie in `[0, 1]` and sum to at most one.
    ///
    /// # Errors
    /// Returns [`SplitError::InvalidRatio`] for non-finite or out-of-range
    /// ratios and [`SplitError::RatiosExceedOne`] when the sum exceeds one.
    pub fn validate(&self) -> Result<(), SplitError> {
        check_ratio("train", self.train)?;
        check_ratio("val", self.val)?;
        if self.train + self.val > 1.0 + f64::EPSILON {
            return Err(SplitError::RatiosExceedOne {
                train: self.train,
                val: self.val,
            });
        }
        Ok(())
    }

    /// Computes split sizes for `nodes` nodes.
    ///
    /// # Errors
    /// Returns [`SplitError`] when the ratios are invalid.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::float_arithmetic,
        reason = "split sizes truncate `ratio * nodes` towards zero"
    )]
    pub fn counts(&self, nodes: usize) -> Result<SplitCounts, SplitError> {
        self.validate()?;
        let total = nodes as f64;
        let train = ((total * self.train).floor() as usize).min(nodes);
        let val = ((total * self.val).floor() as usize).min(nodes - train);
        Ok(SplitCounts {
            train,
            val,
            test: nodes - train - val,
        })
    }
}

fn check_ratio(split: &'static str, ratio: f64) -> Result<(), SplitError> {
    if ratio.is_finite() && (0.0..=1.0).contains(&ratio) {
        Ok(())
    } else {
        Err(SplitError::InvalidRatio { split, ratio })
    }
}

/// Number of nodes in each split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SplitCounts {
    /// Train split size.
    pub train: usize,
    /// Validation split size.
    pub val: usize,
    /// Test split size.
    pub test: usize,
}

/// Partition a node belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Split {
    /// Training nodes.
    Train,
    /// Validation nodes.
    Val,
    /// Test nodes.
    Test,
}

/// Three disjoint boolean masks that together cover every node once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitMasks {
    train: Vec<bool>,
    val: Vec<bool>,
    test: Vec<bool>,
}

impl SplitMasks {
    /// Builds contiguous masks over `nodes` nodes.
    ///
    /// # Errors
    /// Returns [`SplitError`] when `ratios` are invalid.
    ///
    /// # Examples
    /// ```
    /// use graphset_core::{Split, SplitMasks, SplitRatios};
    ///
    /// let masks = SplitMasks::contiguous(10, &SplitRatios::default())?;
    /// assert_eq!(masks.assignment(0), Some(Split::Train));
    /// assert_eq!(masks.assignment(6), Some(Split::Val));
    /// assert_eq!(masks.assignment(9), Some(Split::Test));
    /// assert_eq!(masks.assignment(10), None);
    /// # Ok::<(), graphset_core::SplitError>(())
    /// ```
    pub fn contiguous(nodes: usize, ratios: &SplitRatios) -> Result<Self, SplitError> {
        let counts = ratios.counts(nodes)?;
        let val_end = counts.train + counts.val;
        let mask = |range: std::ops::Range<usize>| -> Vec<bool> {
            (0..nodes).map(|node| range.contains(&node)).collect()
        };
        Ok(Self {
            train: mask(0..counts.train),
            val: mask(counts.train..val_end),
            test: mask(val_end..nodes),
        })
    }

    /// Returns the number of nodes covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.train.len()
    }

    /// Returns whether the masks cover no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.train.is_empty()
    }

    /// Returns the train mask.
    #[must_use]
    pub fn train(&self) -> &[bool] {
        &self.train
    }

    /// Returns the validation mask.
    #[must_use]
    pub fn val(&self) -> &[bool] {
        &self.val
    }

    /// Returns the test mask.
    #[must_use]
    pub fn test(&self) -> &[bool] {
        &self.test
    }

    /// Returns the split containing `node`.
    #[must_use]
    pub fn assignment(&self, node: usize) -> Option<Split> {
        if self.train.get(node).copied()? {
            Some(Split::Train)
        } else if self.val.get(node).copied()? {
            Some(Split::Val)
        } else if self.test.get(node).copied()? {
            Some(Split::Test)
        } else {
            None
        }
    }

    /// Counts the nodes flagged in each mask.
    #[must_use]
    pub fn counts(&self) -> SplitCounts {
        let flagged = |mask: &[bool]| mask.iter().filter(|&&flag| flag).count();
        SplitCounts {
            train: flagged(&self.train),
            val: flagged(&self.val),
            test: flagged(&self.test),
        }
    }
}
