use rand::{Rng, RngCore};
use serde_json::Value;

use fixturist_core::PrimitiveKind;

use crate::generators::{Generator, GeneratorRegistry};

const DEFAULT_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MIN_TEXT_LEN: usize = 3;
const TEXT_LEN_SPAN: usize = 50;

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(BoolGenerator));
    for kind in [
        PrimitiveKind::I8,
        PrimitiveKind::I16,
        PrimitiveKind::I32,
        PrimitiveKind::I64,
    ] {
        registry.register_generator(Box::new(SignedIntGenerator { kind }));
    }
    for kind in [
        PrimitiveKind::U8,
        PrimitiveKind::U16,
        PrimitiveKind::U32,
        PrimitiveKind::U64,
    ] {
        registry.register_generator(Box::new(UnsignedIntGenerator { kind }));
    }
    registry.register_generator(Box::new(FloatGenerator {
        kind: PrimitiveKind::F32,
    }));
    registry.register_generator(Box::new(FloatGenerator {
        kind: PrimitiveKind::F64,
    }));
    registry.register_generator(Box::new(TextGenerator));
}

struct BoolGenerator;

impl Generator for BoolGenerator {
    fn id(&self) -> &'static str {
        "primitive.bool"
    }

    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Bool
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Value {
        Value::Bool(rng.random_bool(0.5))
    }
}

/// Non-negative values below the kind's maximum.
struct SignedIntGenerator {
    kind: PrimitiveKind,
}

impl Generator for SignedIntGenerator {
    fn id(&self) -> &'static str {
        match self.kind {
            PrimitiveKind::I8 => "primitive.i8",
            PrimitiveKind::I16 => "primitive.i16",
            PrimitiveKind::I32 => "primitive.i32",
            _ => "primitive.i64",
        }
    }

    fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Value {
        match self.kind {
            PrimitiveKind::I8 => Value::from(rng.random_range(0..i8::MAX)),
            PrimitiveKind::I16 => Value::from(rng.random_range(0..i16::MAX)),
            PrimitiveKind::I32 => Value::from(rng.random_range(0..i32::MAX)),
            _ => Value::from(rng.random_range(0..i64::MAX)),
        }
    }
}

/// Values across the kind's full range.
struct UnsignedIntGenerator {
    kind: PrimitiveKind,
}

impl Generator for UnsignedIntGenerator {
    fn id(&self) -> &'static str {
        match self.kind {
            PrimitiveKind::U8 => "primitive.u8",
            PrimitiveKind::U16 => "primitive.u16",
            PrimitiveKind::U32 => "primitive.u32",
            _ => "primitive.u64",
        }
    }

    fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Value {
        match self.kind {
            PrimitiveKind::U8 => Value::from(rng.random::<u8>()),
            PrimitiveKind::U16 => Value::from(rng.random::<u16>()),
            PrimitiveKind::U32 => Value::from(rng.random::<u32>()),
            _ => Value::from(rng.random::<u64>()),
        }
    }
}

/// Values in `[0, 1)`.
struct FloatGenerator {
    kind: PrimitiveKind,
}

impl Generator for FloatGenerator {
    fn id(&self) -> &'static str {
        match self.kind {
            PrimitiveKind::F32 => "primitive.f32",
            _ => "primitive.f64",
        }
    }

    fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Value {
        match self.kind {
            PrimitiveKind::F32 => Value::from(rng.random::<f32>()),
            _ => Value::from(rng.random::<f64>()),
        }
    }
}

/// Alphanumeric text, never shorter than three characters.
struct TextGenerator;

impl Generator for TextGenerator {
    fn id(&self) -> &'static str {
        "primitive.string"
    }

    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::String
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Value {
        let len = MIN_TEXT_LEN + rng.random_range(0..TEXT_LEN_SPAN);
        let text: String = (0..len)
            .map(|_| DEFAULT_CHARSET[rng.random_range(0..DEFAULT_CHARSET.len())] as char)
            .collect();
        Value::String(text)
    }
}
