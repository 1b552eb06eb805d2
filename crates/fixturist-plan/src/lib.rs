//! Directive store for Fixturist generation runs.
//!
//! A [`Plan`] collects, per qualified field path, the directives a caller
//! attached before a run: omissions, fixed values, sub-generators, positional
//! sequences, field handlers, constraints, and item-count policies.

pub mod constraints;
pub mod directives;
pub mod plan;
pub mod run;
pub mod sequence;

pub use constraints::{
    FieldConstraint, NumericRange, Pattern, Predicate, StringLength, constrain_pattern,
    constrain_range, constrain_string_length, constrain_with,
};
pub use directives::{FieldHandler, FieldSetter, MapSetter};
pub use plan::{DEFAULT_CONSTRAINT_RETRY_ATTEMPTS, Plan};
pub use run::{DEFAULT_MIN_SPAN, PlanRun, RunKind, RunPolicy};
pub use sequence::Sequence;
