//! Fixture generation engine for Fixturist.
//!
//! Walks a type's [`fixturist_core::Shape`] and materializes populated
//! instances under the directives of a [`fixturist_plan::Plan`], falling back
//! to randomized defaults for every untouched field. [`mock`] and [`tap`]
//! build the directive set fluently; [`Factory::execute`] runs it.

pub mod engine;
pub mod errors;
pub mod evaluate;
pub mod factory;
pub mod generators;
pub mod model;

pub use engine::GenerationEngine;
pub use errors::GenerationError;
pub use factory::{Factory, Untyped, mock, tap};
pub use generators::{Generator, GeneratorRegistry};
pub use model::GenerateOptions;
