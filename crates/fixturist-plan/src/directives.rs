use std::fmt;
use std::rc::Rc;

use fixturist_core::Value;

use crate::plan::Plan;
use crate::sequence::Sequence;

/// Per-item callback: receives the item index, returns the field value.
pub type FieldHandler = Rc<dyn Fn(usize) -> serde_json::Result<Value>>;

/// Value source registered for a field. A later registration on the same
/// path replaces an earlier one.
#[derive(Clone)]
pub enum FieldSetter {
    Fixed(Value),
    /// A nested plan that builds the field (a "tap").
    SubGenerator(Rc<Plan>),
    Sequence(Sequence),
}

impl FieldSetter {
    /// Whether the value comes from an explicit caller directive rather than
    /// a positional sequence.
    pub fn is_explicit(&self) -> bool {
        matches!(self, FieldSetter::Fixed(_) | FieldSetter::SubGenerator(_))
    }
}

impl fmt::Debug for FieldSetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSetter::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            FieldSetter::SubGenerator(plan) => f
                .debug_struct("SubGenerator")
                .field("item_count", &plan.item_count())
                .finish(),
            FieldSetter::Sequence(sequence) => f.debug_tuple("Sequence").field(sequence).finish(),
        }
    }
}

/// Key and value sequences for a map field, keyed by the map's own path.
#[derive(Debug, Clone, Default)]
pub struct MapSetter {
    pub keys: Option<Sequence>,
    pub values: Option<Sequence>,
}
