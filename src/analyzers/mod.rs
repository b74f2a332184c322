//! Underemployment and career-trajectory aggregators.
//!
//! Each sub-analysis is a pure function over the shared prepared table:
//! field-level risk, completion-rate gradient, institution-type effects,
//! socioeconomic stratification, and scarring patterns, bundled by the
//! pipeline into a single result set.

pub mod completion;
pub mod fields;
pub mod institution;
pub mod pipeline;
pub mod scarring;
pub mod socioeconomic;
pub mod summary;
pub mod types;
pub mod utility;
