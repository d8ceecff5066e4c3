//! Region growth and its admission predicates.

pub mod predicate;
pub mod flood_fill;

pub use predicate::{AdmissionPredicate, GradientSimilarityPredicate, PredicateKind, ThresholdPredicate, DEFAULT_SIMILARITY};
pub use flood_fill::{flood_fill, MarkedSet};
