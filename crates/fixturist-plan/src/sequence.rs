use std::cell::Cell;
use std::rc::Rc;

use fixturist_core::Value;

/// Positional values handed out to a field, one per generation.
///
/// Clones share their backing values and, for across sequences, their
/// cursor, so a sequence copied into a child plan keeps counting where the
/// parent left off.
#[derive(Debug, Clone)]
pub enum Sequence {
    /// Addressed by the caller's index. Indices past the end yield nothing.
    ByIndex(Rc<[Value]>),
    /// Addressed by a counter that advances on every use and never resets.
    Across {
        values: Rc<[Value]>,
        cursor: Rc<Cell<usize>>,
    },
}

impl Sequence {
    pub fn by_index(values: Vec<Value>) -> Self {
        Sequence::ByIndex(values.into())
    }

    pub fn across(values: Vec<Value>) -> Self {
        Sequence::Across {
            values: values.into(),
            cursor: Rc::new(Cell::new(0)),
        }
    }

    /// Value for `index`, or `None` once the sequence is exhausted.
    pub fn value_at(&self, index: usize) -> Option<Value> {
        match self {
            Sequence::ByIndex(values) => values.get(index).cloned(),
            Sequence::Across { values, cursor } => {
                let position = cursor.get();
                cursor.set(position + 1);
                values.get(position).cloned()
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Sequence::ByIndex(values) | Sequence::Across { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
