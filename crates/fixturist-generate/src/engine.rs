use rand::RngCore;
use serde_json::{Map, Value};
use tracing::{debug, error};

use fixturist_core::{PrimitiveKind, RecordShape, Shape, map_key, qualified_path};
use fixturist_plan::{FieldSetter, Plan};

use crate::errors::GenerationError;
use crate::evaluate::evaluate;
use crate::generators::GeneratorRegistry;

/// Walks a shape and materializes instances under a plan's directives.
///
/// One engine serves a whole top-level run, including every nested record
/// and sub-generator it recurses into, so they all draw from the same
/// random source.
pub struct GenerationEngine<'a> {
    registry: &'a GeneratorRegistry,
    rng: &'a mut dyn RngCore,
}

impl<'a> GenerationEngine<'a> {
    pub fn new(registry: &'a GeneratorRegistry, rng: &'a mut dyn RngCore) -> Self {
        Self { registry, rng }
    }

    /// Produce every item of `plan` for `root`.
    ///
    /// The item count is drawn once per call and recorded on the plan.
    pub fn run(&mut self, plan: &Plan, root: &Shape) -> Result<Vec<Value>, GenerationError> {
        if let Some(message) = plan.invalid_directives().first() {
            return Err(GenerationError::InvalidDirective(message.clone()));
        }

        let run = plan.item_count().resolve(&mut *self.rng);
        plan.record_run(run);

        let mut items = Vec::with_capacity(run.count);
        for index in 0..run.count {
            items.push(self.generate_item(plan, root, index)?);
        }
        Ok(items)
    }

    fn generate_item(
        &mut self,
        plan: &Plan,
        shape: &Shape,
        index: usize,
    ) -> Result<Value, GenerationError> {
        match shape {
            Shape::Record(record) => self.populate_record(plan, record, index),
            Shape::Indirect { inner, .. } => self.generate_item(plan, inner, index),
            Shape::Primitive(kind) => Ok(self
                .registry
                .generate(*kind, &mut *self.rng)
                .unwrap_or_else(|| kind.zero_value())),
            other => Ok(self
                .dispatch(plan, other, plan.parent_path(), index)?
                .unwrap_or_else(|| other.zero_value())),
        }
    }

    fn populate_record(
        &mut self,
        plan: &Plan,
        record: &RecordShape,
        index: usize,
    ) -> Result<Value, GenerationError> {
        let mut object = Map::new();
        for field in record.fields() {
            let shape = field.shape();
            if !field.is_settable() {
                object.insert(field.name().to_string(), shape.zero_value());
                continue;
            }

            let path = qualified_path(plan.parent_path(), field.name());
            let value = if plan.is_omitted(&path) {
                None
            } else {
                self.generate_value(plan, &shape, &path, index)?
            };
            object.insert(
                field.name().to_string(),
                value.unwrap_or_else(|| shape.zero_value()),
            );
        }
        Ok(Value::Object(object))
    }

    /// Value for one field: a registered handler wins outright, everything
    /// else goes through the field's constraint, if any.
    fn generate_value(
        &mut self,
        plan: &Plan,
        shape: &Shape,
        path: &str,
        index: usize,
    ) -> Result<Option<Value>, GenerationError> {
        if let Some(handler) = plan.handler(path) {
            return Ok(Some(handler(index)?));
        }

        let Some(constraint) = plan.constraint(path) else {
            return self.generate_field_value(plan, shape, path, index);
        };
        let explicit = plan.setter(path).is_some_and(FieldSetter::is_explicit);
        evaluate(
            path,
            constraint,
            explicit,
            plan.max_constraint_retries(),
            || self.generate_field_value(plan, shape, path, index),
        )
    }

    /// Resolve the field's directive, falling back to its shape's strategy.
    /// `None` leaves the field at its zero value.
    fn generate_field_value(
        &mut self,
        plan: &Plan,
        shape: &Shape,
        path: &str,
        index: usize,
    ) -> Result<Option<Value>, GenerationError> {
        match plan.setter(path) {
            Some(FieldSetter::SubGenerator(sub_generator)) => {
                let child = plan.sub_generator_plan(sub_generator, path);
                self.run_sub_generator(&child, shape, path)
            }
            Some(FieldSetter::Sequence(sequence)) => Ok(sequence.value_at(index)),
            Some(FieldSetter::Fixed(value)) => Ok(Some(value.clone())),
            None => self.dispatch(plan, shape, path, index),
        }
    }

    fn dispatch(
        &mut self,
        plan: &Plan,
        shape: &Shape,
        path: &str,
        index: usize,
    ) -> Result<Option<Value>, GenerationError> {
        match shape {
            Shape::Primitive(kind) => Ok(self.registry.generate(*kind, &mut *self.rng)),
            Shape::Record(record) => {
                let child = plan.nested_record_plan(path);
                debug!(path, record = record.name(), "populating nested record");
                self.populate_record(&child, record, index).map(Some)
            }
            Shape::Sequence(_) => {
                let mut tap = Plan::new();
                tap.set_item_count(plan.map_item_count(path).unwrap_or_default());
                let child = plan.sub_generator_plan(&tap, path);
                self.run_sub_generator(&child, shape, path)
            }
            Shape::Map { key, value } => self.generate_map(plan, key, value, path).map(Some),
            Shape::Indirect { inner, .. } => self.dispatch(plan, inner, path, index),
            Shape::Open => Ok(None),
            Shape::Unsupported(type_name) => {
                error!(path, type_name, "unsupported type");
                Err(GenerationError::UnsupportedShape {
                    path: path.to_string(),
                    type_name: (*type_name).to_string(),
                })
            }
        }
    }

    /// Run a sub-generator at `path`. A sequence field takes every produced
    /// element; any other field takes the first item.
    fn run_sub_generator(
        &mut self,
        child: &Plan,
        shape: &Shape,
        path: &str,
    ) -> Result<Option<Value>, GenerationError> {
        debug!(path, item_count = ?child.item_count(), "running sub-generator");
        match shape {
            Shape::Sequence(element) => Ok(Some(Value::Array(self.run(child, element)?))),
            other => Ok(self.run(child, other)?.into_iter().next()),
        }
    }

    fn generate_map(
        &mut self,
        plan: &Plan,
        key_shape: &Shape,
        value_shape: &Shape,
        path: &str,
    ) -> Result<Value, GenerationError> {
        let setter = plan.map_setter(path);
        let key_sequence = setter.and_then(|setter| setter.keys.as_ref());
        let value_sequence = setter.and_then(|setter| setter.values.as_ref());
        let key_kind = key_shape.primitive_kind();
        if key_sequence.is_none() && key_kind.is_none() {
            return Err(GenerationError::UnsupportedMapKey {
                path: path.to_string(),
            });
        }

        let run = plan
            .map_item_count(path)
            .unwrap_or_default()
            .resolve(&mut *self.rng);
        plan.record_map_run(path, run);

        let mut entries = Map::new();
        for entry_index in 0..run.count {
            let key = match (key_sequence, key_kind) {
                (Some(keys), _) => {
                    let key = keys
                        .value_at(entry_index)
                        .unwrap_or_else(|| key_shape.zero_value());
                    encode_map_key(&key, path)?
                }
                (None, Some(kind)) => {
                    self.distinct_map_key(plan, kind, &entries, path, run.count)?
                }
                (None, None) => encode_map_key(&key_shape.zero_value(), path)?,
            };

            let value = match value_sequence {
                Some(values) => values.value_at(entry_index),
                None => self.generate_map_value(plan, value_shape, path, entry_index)?,
            };
            entries.insert(key, value.unwrap_or_else(|| value_shape.zero_value()));
        }
        Ok(Value::Object(entries))
    }

    /// Draw a generated key not yet present in `entries`, redrawing up to the
    /// plan's retry ceiling.
    fn distinct_map_key(
        &mut self,
        plan: &Plan,
        kind: PrimitiveKind,
        entries: &Map<String, Value>,
        path: &str,
        requested: usize,
    ) -> Result<String, GenerationError> {
        for _ in 0..=plan.max_constraint_retries() {
            let key = self
                .registry
                .generate(kind, &mut *self.rng)
                .unwrap_or_else(|| kind.zero_value());
            let key = encode_map_key(&key, path)?;
            if !entries.contains_key(&key) {
                return Ok(key);
            }
        }
        error!(path, requested, drawn = entries.len(), "map key space exhausted");
        Err(GenerationError::MapKeySpaceExhausted {
            path: path.to_string(),
            requested,
        })
    }

    /// Value of one map entry. A list value is built as its own single-item
    /// run, independent of the map's entry count.
    fn generate_map_value(
        &mut self,
        plan: &Plan,
        value_shape: &Shape,
        path: &str,
        entry_index: usize,
    ) -> Result<Option<Value>, GenerationError> {
        if let Some(kind) = value_shape.pointee_primitive_kind() {
            return Ok(self.registry.generate(kind, &mut *self.rng));
        }
        match value_shape {
            Shape::Sequence(_) => {
                let child = plan.sub_generator_plan(&Plan::new(), path);
                self.run_sub_generator(&child, value_shape, path)
            }
            Shape::Indirect { inner, .. } => {
                self.generate_map_value(plan, inner, path, entry_index)
            }
            other => self.dispatch(plan, other, path, entry_index),
        }
    }
}

fn encode_map_key(key: &Value, path: &str) -> Result<String, GenerationError> {
    map_key(key).map_err(|err| {
        GenerationError::InvalidDirective(format!("map key for field '{path}': {err}"))
    })
}
