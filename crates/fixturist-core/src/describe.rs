use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use crate::shape::Shape;
use crate::types::PrimitiveKind;

/// Types that can describe their own shape to the generation engine.
///
/// Records implement this by hand with [`crate::RecordShape`]:
///
/// ```
/// use fixturist_core::{Describe, RecordShape, Shape};
///
/// struct Engine {
///     cylinders: i32,
///     serial_number: String,
/// }
///
/// impl Describe for Engine {
///     fn shape() -> Shape {
///         RecordShape::new("Engine")
///             .field::<i32>("cylinders")
///             .field::<String>("serial_number")
///             .into()
///     }
/// }
/// ```
pub trait Describe {
    fn shape() -> Shape;
}

macro_rules! describe_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn shape() -> Shape {
                    Shape::Primitive(PrimitiveKind::$kind)
                }
            }
        )*
    };
}

describe_primitive! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => I32,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => U32,
    f32 => F32,
    f64 => F64,
    String => String,
}

impl<T: Describe> Describe for Vec<T> {
    fn shape() -> Shape {
        Shape::sequence(T::shape())
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn shape() -> Shape {
        Shape::sequence(T::shape())
    }
}

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn shape() -> Shape {
        Shape::sequence(T::shape())
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn shape() -> Shape {
        Shape::sequence(T::shape())
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::map(K::shape(), V::shape())
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::map(K::shape(), V::shape())
    }
}

impl<T: Describe> Describe for Option<T> {
    fn shape() -> Shape {
        Shape::optional(T::shape())
    }
}

impl<T: Describe> Describe for Box<T> {
    fn shape() -> Shape {
        Shape::pointer(T::shape())
    }
}

impl Describe for serde_json::Value {
    fn shape() -> Shape {
        Shape::Open
    }
}
