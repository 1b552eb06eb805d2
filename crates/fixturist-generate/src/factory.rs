use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;
use std::time::Instant;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use fixturist_core::{Describe, Shape, to_value};
use fixturist_plan::{FieldConstraint, Plan, PlanRun, RunPolicy};

use crate::engine::GenerationEngine;
use crate::errors::GenerationError;
use crate::generators::GeneratorRegistry;
use crate::model::GenerateOptions;

/// Type parameter of a factory that is not bound to a root type.
#[derive(Debug, Clone, Copy)]
pub struct Untyped;

/// Builder collecting directives for one root type.
///
/// Every directive method consumes and returns the factory so calls chain.
/// Paths join field names with `.` and must match declared names exactly;
/// a path no field reaches is accepted and never applied.
pub struct Factory<T = Untyped> {
    root: Option<Shape>,
    plan: Plan,
    options: GenerateOptions,
    marker: PhantomData<fn() -> T>,
}

/// Factory bound to `T`, producing exactly one item unless told otherwise.
pub fn mock<T: Describe>() -> Factory<T> {
    Factory::with_root(Some(T::shape()))
}

/// Unbound factory, used as a sub-generator for a field through
/// [`Factory::ensure_via`].
pub fn tap() -> Factory {
    Factory::with_root(None)
}

impl<T> Factory<T> {
    fn with_root(root: Option<Shape>) -> Self {
        Self {
            root,
            plan: Plan::new(),
            options: GenerateOptions::default(),
            marker: PhantomData,
        }
    }

    pub fn omit(mut self, path: impl Into<String>) -> Self {
        self.plan.omit(path);
        self
    }

    /// Fix the field at `path` to `value` in every item.
    pub fn ensure(mut self, path: impl Into<String>, value: impl Serialize) -> Self {
        let path = path.into();
        match to_value(&value) {
            Ok(value) => self.plan.fix(path, value),
            Err(err) => self
                .plan
                .record_invalid_directive(format!("value for field '{path}': {err}")),
        }
        self
    }

    /// Build the field at `path` with another factory's directives.
    pub fn ensure_via<U>(mut self, path: impl Into<String>, sub_generator: Factory<U>) -> Self {
        self.plan.fix_via(path, sub_generator.plan);
        self
    }

    pub fn ensure_constraint(
        mut self,
        path: impl Into<String>,
        constraint: impl FieldConstraint + 'static,
    ) -> Self {
        self.plan.constrain(path, constraint);
        self
    }

    /// Item `i` gets the `i`-th value; items past the end keep the zero value.
    pub fn ensure_sequence<V: Serialize>(
        mut self,
        path: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let path = path.into();
        if let Some(values) = self.convert_values(&path, values) {
            self.plan.sequence(path, values);
        }
        self
    }

    /// Every use of the path takes the next value, across items and
    /// across runs of an enclosing sub-generator.
    pub fn ensure_sequence_across<V: Serialize>(
        mut self,
        path: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let path = path.into();
        if let Some(values) = self.convert_values(&path, values) {
            self.plan.sequence_across(path, values);
        }
        self
    }

    pub fn ensure_map_key_sequence<V: Serialize>(
        mut self,
        path: impl Into<String>,
        keys: impl IntoIterator<Item = V>,
    ) -> Self {
        let path = path.into();
        if let Some(keys) = self.convert_values(&path, keys) {
            self.plan.map_key_sequence(path, keys);
        }
        self
    }

    pub fn ensure_map_value_sequence<V: Serialize>(
        mut self,
        path: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let path = path.into();
        if let Some(values) = self.convert_values(&path, values) {
            self.plan.map_value_sequence(path, values);
        }
        self
    }

    /// Compute the field at `path` from the item index. Takes precedence over
    /// every other directive on the same path.
    pub fn on_field<V, F>(mut self, path: impl Into<String>, handler: F) -> Self
    where
        V: Serialize,
        F: Fn(usize) -> V + 'static,
    {
        self.plan
            .on_field(path, Rc::new(move |index: usize| serde_json::to_value(handler(index))));
        self
    }

    pub fn with_exact_items(mut self, count: usize) -> Self {
        self.plan.set_item_count(RunPolicy::exact(count));
        self
    }

    /// Between `count` and `count + 9` items.
    pub fn with_min_items(mut self, count: usize) -> Self {
        self.plan.set_item_count(RunPolicy::min(count));
        self
    }

    pub fn with_min_items_span(mut self, count: usize, span: usize) -> Self {
        self.plan.set_item_count(RunPolicy::min_with_span(count, span));
        self
    }

    /// Between zero and `count` items.
    pub fn with_max_items(mut self, count: usize) -> Self {
        self.plan.set_item_count(RunPolicy::max(count));
        self
    }

    pub fn with_exact_map_items(mut self, path: impl Into<String>, count: usize) -> Self {
        self.plan.set_map_item_count(path, RunPolicy::exact(count));
        self
    }

    pub fn with_min_map_items(mut self, path: impl Into<String>, count: usize) -> Self {
        self.plan.set_map_item_count(path, RunPolicy::min(count));
        self
    }

    pub fn with_min_map_items_span(
        mut self,
        path: impl Into<String>,
        count: usize,
        span: usize,
    ) -> Self {
        self.plan
            .set_map_item_count(path, RunPolicy::min_with_span(count, span));
        self
    }

    pub fn with_max_map_items(mut self, path: impl Into<String>, count: usize) -> Self {
        self.plan.set_map_item_count(path, RunPolicy::max(count));
        self
    }

    pub fn with_max_constraint_retries(mut self, attempts: u32) -> Self {
        self.plan.set_max_constraint_retries(attempts);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.options.seed = Some(seed);
        self
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Item count drawn by the most recent run.
    pub fn last_run(&self) -> Option<PlanRun> {
        self.plan.last_run()
    }

    /// Entry count drawn by the most recent run for the map at `path`.
    pub fn map_last_run(&self, path: &str) -> Option<PlanRun> {
        self.plan.map_last_run(path)
    }

    /// Generate every item as a value tree.
    pub fn execute(&self) -> Result<Vec<Value>, GenerationError> {
        let seed = self
            .options
            .seed
            .unwrap_or_else(|| rand::rng().random::<u64>());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.execute_logged(&mut rng, Some(seed))
    }

    /// Generate every item drawing from `rng`; the configured seed is ignored.
    pub fn execute_with_rng(&self, rng: &mut dyn RngCore) -> Result<Vec<Value>, GenerationError> {
        self.execute_logged(rng, None)
    }

    fn execute_logged(
        &self,
        rng: &mut dyn RngCore,
        seed: Option<u64>,
    ) -> Result<Vec<Value>, GenerationError> {
        let root = self.root.as_ref().ok_or(GenerationError::UnboundRoot)?;
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let registry = GeneratorRegistry::global();

        info!(
            run_id = %run_id,
            root = %root.type_name(),
            seed = ?seed,
            item_count = ?self.plan.item_count(),
            "generation started"
        );

        let outcome = if self.options.capture_panics {
            catch_unwind(AssertUnwindSafe(|| {
                GenerationEngine::new(registry, rng).run(&self.plan, root)
            }))
            .unwrap_or_else(|panic| Err(GenerationError::Panicked(panic_message(panic))))
        } else {
            GenerationEngine::new(registry, rng).run(&self.plan, root)
        };

        match outcome {
            Ok(items) => {
                info!(
                    run_id = %run_id,
                    items = items.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "generation completed"
                );
                Ok(items)
            }
            Err(err) => {
                warn!(run_id = %run_id, error = %err, "generation failed");
                Err(err)
            }
        }
    }

    fn convert_values<V: Serialize>(
        &mut self,
        path: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Option<Vec<Value>> {
        let converted: Result<Vec<Value>, _> =
            values.into_iter().map(|value| to_value(&value)).collect();
        match converted {
            Ok(values) => Some(values),
            Err(err) => {
                self.plan
                    .record_invalid_directive(format!("values for field '{path}': {err}"));
                None
            }
        }
    }
}

impl<T: DeserializeOwned> Factory<T> {
    /// Generate every item and materialize it as `T`.
    pub fn execute_to_type(&self) -> Result<Vec<T>, GenerationError> {
        self.execute()?
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item)
                    .map_err(|source| GenerationError::Materialize { index, source })
            })
            .collect()
    }
}

impl<T> Clone for Factory<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            plan: self.plan.clone(),
            options: self.options.clone(),
            marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Factory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("root", &self.root.as_ref().map(Shape::type_name))
            .field("plan", &self.plan)
            .field("options", &self.options)
            .finish()
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic during generation".to_string()
    }
}
