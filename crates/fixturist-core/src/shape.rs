use serde_json::{Map, Value};

use crate::describe::Describe;
use crate::types::PrimitiveKind;

/// Composite shape of a type as seen by the generation engine.
///
/// The set of shapes is closed: the engine has one strategy per variant.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A scalar produced by the default generator registry.
    Primitive(PrimitiveKind),
    /// A record with named fields, walked in declaration order.
    Record(RecordShape),
    /// A list-like container of homogeneous elements.
    Sequence(Box<Shape>),
    /// A key-value container.
    Map { key: Box<Shape>, value: Box<Shape> },
    /// An owned indirection to another shape. `nullable` indirections
    /// (`Option<T>`) are `null` when untouched, the others (`Box<T>`) hold the
    /// pointee's zero value.
    Indirect { inner: Box<Shape>, nullable: bool },
    /// A field whose concrete shape is unknown until a value is supplied.
    Open,
    /// A type the engine cannot build.
    Unsupported(&'static str),
}

impl Shape {
    pub fn sequence(element: Shape) -> Self {
        Shape::Sequence(Box::new(element))
    }

    pub fn map(key: Shape, value: Shape) -> Self {
        Shape::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn optional(inner: Shape) -> Self {
        Shape::Indirect {
            inner: Box::new(inner),
            nullable: true,
        }
    }

    pub fn pointer(inner: Shape) -> Self {
        Shape::Indirect {
            inner: Box::new(inner),
            nullable: false,
        }
    }

    /// Shape for a type that may be described but never generated.
    pub fn unsupported<T: ?Sized>() -> Self {
        Shape::Unsupported(std::any::type_name::<T>())
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Shape::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// The primitive kind of this shape, looking through one indirection.
    pub fn pointee_primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Shape::Primitive(kind) => Some(*kind),
            Shape::Indirect { inner, .. } => inner.primitive_kind(),
            _ => None,
        }
    }

    pub fn is_indirect(&self) -> bool {
        matches!(self, Shape::Indirect { .. })
    }

    /// Short human-readable label used in logs and error messages.
    pub fn type_name(&self) -> String {
        match self {
            Shape::Primitive(kind) => kind.to_string(),
            Shape::Record(record) => record.name().to_string(),
            Shape::Sequence(element) => format!("[{}]", element.type_name()),
            Shape::Map { key, value } => format!("map<{}, {}>", key.type_name(), value.type_name()),
            Shape::Indirect {
                inner,
                nullable: true,
            } => format!("option<{}>", inner.type_name()),
            Shape::Indirect {
                inner,
                nullable: false,
            } => format!("box<{}>", inner.type_name()),
            Shape::Open => "open".to_string(),
            Shape::Unsupported(name) => (*name).to_string(),
        }
    }

    /// The value an untouched instance of this shape holds.
    pub fn zero_value(&self) -> Value {
        match self {
            Shape::Primitive(kind) => kind.zero_value(),
            Shape::Record(record) => record.zero_value(),
            Shape::Sequence(_) => Value::Array(Vec::new()),
            Shape::Map { .. } => Value::Object(Map::new()),
            Shape::Indirect {
                inner,
                nullable: false,
            } => inner.zero_value(),
            Shape::Indirect { nullable: true, .. } | Shape::Open | Shape::Unsupported(_) => {
                Value::Null
            }
        }
    }
}

impl From<PrimitiveKind> for Shape {
    fn from(kind: PrimitiveKind) -> Self {
        Shape::Primitive(kind)
    }
}

impl From<RecordShape> for Shape {
    fn from(record: RecordShape) -> Self {
        Shape::Record(record)
    }
}

/// Descriptor for a record type: its name and fields in declaration order.
#[derive(Debug, Clone)]
pub struct RecordShape {
    name: &'static str,
    fields: Vec<FieldShape>,
}

impl RecordShape {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Append a field the engine may populate. `name` must match the field's
    /// serialized name.
    pub fn field<T: Describe>(self, name: impl Into<String>) -> Self {
        self.push(FieldShape::new(name, true, T::shape))
    }

    /// Append a field that cannot be set from outside; it is always left at
    /// its zero value.
    pub fn private_field<T: Describe>(self, name: impl Into<String>) -> Self {
        self.push(FieldShape::new(name, false, T::shape))
    }

    /// Append a field described by an explicit shape function.
    pub fn field_with(self, name: impl Into<String>, describe: fn() -> Shape) -> Self {
        self.push(FieldShape::new(name, true, describe))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|field| field.name() == name)
    }

    pub fn zero_value(&self) -> Value {
        let mut object = Map::new();
        for field in &self.fields {
            object.insert(field.name().to_string(), field.shape().zero_value());
        }
        Value::Object(object)
    }

    fn push(mut self, field: FieldShape) -> Self {
        self.fields.push(field);
        self
    }
}

/// A single record field. Its shape is resolved on demand so that describing
/// a self-referential record terminates.
#[derive(Debug, Clone)]
pub struct FieldShape {
    name: String,
    settable: bool,
    describe: fn() -> Shape,
}

impl FieldShape {
    pub fn new(name: impl Into<String>, settable: bool, describe: fn() -> Shape) -> Self {
        Self {
            name: name.into(),
            settable,
            describe,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_settable(&self) -> bool {
        self.settable
    }

    pub fn shape(&self) -> Shape {
        (self.describe)()
    }
}
