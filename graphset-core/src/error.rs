//! Error types for the graphset core library.
//!
//! Each enum carries a stable machine-readable code so callers can branch on
//! failures (or log them) without matching on display strings.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident
                    $( { $($named:tt)* } )?
                    $( ( $($unnamed:tt)* ) )?
                    => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(
                        Self::$ErrVariant
                            $( { $($named)* } )?
                            $( ( $($unnamed)* ) )?
                            => $CodeTy::$CodeVariant,
                    )+
                }
            }
        }
    };
}

/// Reasons why a random regular graph cannot be generated.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RegularGraphError {
    /// The total stub count `degree * nodes` is odd, so stubs cannot pair up.
    #[error("degree {degree} times node count {nodes} must be even")]
    OddDegreeSum {
        /// Requested degree.
        degree: usize,
        /// Requested node count.
        nodes: usize,
    },
    /// A simple graph cannot give every node `degree >= nodes` neighbours.
    #[error("degree {degree} must be smaller than node count {nodes}")]
    DegreeTooLarge {
        /// Requested degree.
        degree: usize,
        /// Requested node count.
        nodes: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`RegularGraphError`] variants.
    enum RegularGraphErrorCode for RegularGraphError {
        /// The total stub count is odd.
        OddDegreeSum => OddDegreeSum { .. } => "REGULAR_GRAPH_ODD_DEGREE_SUM",
        /// The degree is not smaller than the node count.
        DegreeTooLarge => DegreeTooLarge { .. } => "REGULAR_GRAPH_DEGREE_TOO_LARGE",
    }
}

/// An error produced while assembling a [`crate::Graph`] or attaching data to it.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// Source and destination endpoint lists differ in length.
    #[error("edge endpoint lists differ in length: src={src}, dst={dst}")]
    LengthMismatch {
        /// Number of source endpoints.
        src: usize,
        /// Number of destination endpoints.
        dst: usize,
    },
    /// An edge references a node outside `0..num_nodes`.
    #[error("edge {edge} references node {node} but the graph has {num_nodes} nodes")]
    NodeOutOfRange {
        /// Position of the offending edge.
        edge: usize,
        /// Node identifier that exceeded the bounds.
        node: usize,
        /// Number of nodes in the graph.
        num_nodes: usize,
    },
    /// Attached data did not have one row per node (or per edge).
    #[error("`{field}` has {actual} rows but {expected} were expected")]
    ShapeMismatch {
        /// Name of the attached field.
        field: &'static str,
        /// Row count required by the graph.
        expected: usize,
        /// Row count supplied by the caller.
        actual: usize,
    },
    /// Weights were requested from a range containing no values.
    #[error("weight range {start}..{end} is empty")]
    EmptyWeightRange {
        /// Inclusive lower bound.
        start: i64,
        /// Exclusive upper bound.
        end: i64,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// Source and destination endpoint lists differ in length.
        LengthMismatch => LengthMismatch { .. } => "GRAPH_LENGTH_MISMATCH",
        /// An edge references a node outside the graph.
        NodeOutOfRange => NodeOutOfRange { .. } => "GRAPH_NODE_OUT_OF_RANGE",
        /// Attached data did not match the graph shape.
        ShapeMismatch => ShapeMismatch { .. } => "GRAPH_SHAPE_MISMATCH",
        /// A weight range contained no values.
        EmptyWeightRange => EmptyWeightRange { .. } => "GRAPH_EMPTY_WEIGHT_RANGE",
    }
}

/// An error produced while validating split ratios.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SplitError {
    /// A ratio was not a finite value in `[0, 1]`.
    #[error("{split} ratio must lie in [0, 1] (got {ratio})")]
    InvalidRatio {
        /// Split the ratio belongs to.
        split: &'static str,
        /// The rejected ratio.
        ratio: f64,
    },
    /// Train and validation ratios together exceed the whole node set.
    #[error("train ratio {train} plus validation ratio {val} exceeds 1")]
    RatiosExceedOne {
        /// Train ratio.
        train: f64,
        /// Validation ratio.
        val: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`SplitError`] variants.
    enum SplitErrorCode for SplitError {
        /// A ratio was outside `[0, 1]`.
        InvalidRatio => InvalidRatio { .. } => "SPLIT_INVALID_RATIO",
        /// Ratios sum to more than one.
        RatiosExceedOne => RatiosExceedOne { .. } => "SPLIT_RATIOS_EXCEED_ONE",
    }
}

/// Error type produced when building or reading a [`crate::Dataset`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DatasetError {
    /// A node carried a category missing from the [`crate::LabelMap`].
    #[error("node {node} has unrecognised category `{category}`")]
    UnknownCategory {
        /// Node whose category could not be mapped.
        node: usize,
        /// The unmapped category.
        category: Arc<str>,
    },
    /// Requested item index was outside the dataset.
    #[error("index {index} is out of bounds for dataset of length {len}")]
    OutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of items in the dataset.
        len: usize,
    },
    /// A build configuration value was rejected.
    #[error("invalid configuration for `{parameter}`: {reason}")]
    InvalidConfig {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
    /// Graph assembly failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Split construction failed.
    #[error(transparent)]
    Split(#[from] SplitError),
}

define_error_codes! {
    /// Stable codes describing [`DatasetError`] variants.
    enum DatasetErrorCode for DatasetError {
        /// A node carried an unrecognised category.
        UnknownCategory => UnknownCategory { .. } => "DATASET_UNKNOWN_CATEGORY",
        /// Requested item index was outside the dataset.
        OutOfBounds => OutOfBounds { .. } => "DATASET_OUT_OF_BOUNDS",
        /// A build configuration value was rejected.
        InvalidConfig => InvalidConfig { .. } => "DATASET_INVALID_CONFIG",
        /// Graph assembly failed.
        GraphFailure => Graph(..) => "DATASET_GRAPH_FAILURE",
        /// Split construction failed.
        SplitFailure => Split(..) => "DATASET_SPLIT_FAILURE",
    }
}

impl DatasetError {
    /// Retrieve the inner [`GraphErrorCode`] when the error originated in graph assembly.
    #[must_use]
    pub const fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Graph(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the dataset API.
pub type Result<T> = core::result::Result<T, DatasetError>;
