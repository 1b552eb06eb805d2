use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use rand::RngCore;
use serde_json::Value;

use fixturist_core::PrimitiveKind;

pub mod primitives;

/// Default value source for one primitive kind.
pub trait Generator: Send + Sync {
    fn id(&self) -> &'static str;

    fn kind(&self) -> PrimitiveKind;

    /// A fresh value on every call.
    fn generate(&self, rng: &mut dyn RngCore) -> Value;
}

/// Default generators keyed by primitive kind.
pub struct GeneratorRegistry {
    generators: BTreeMap<PrimitiveKind, Box<dyn Generator>>,
}

impl GeneratorRegistry {
    /// Registry holding a generator for every primitive kind.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        primitives::register(&mut registry);
        registry
    }

    pub fn empty() -> Self {
        Self {
            generators: BTreeMap::new(),
        }
    }

    /// Shared registry with the default generators.
    pub fn global() -> &'static GeneratorRegistry {
        static REGISTRY: OnceLock<GeneratorRegistry> = OnceLock::new();
        REGISTRY.get_or_init(GeneratorRegistry::new)
    }

    /// Registers `generator`, replacing any previous one for its kind.
    pub fn register_generator(&mut self, generator: Box<dyn Generator>) {
        self.generators.insert(generator.kind(), generator);
    }

    pub fn generator(&self, kind: PrimitiveKind) -> Option<&dyn Generator> {
        self.generators.get(&kind).map(|generator| generator.as_ref())
    }

    pub fn generate(&self, kind: PrimitiveKind, rng: &mut dyn RngCore) -> Option<Value> {
        self.generator(kind).map(|generator| generator.generate(rng))
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.generators.values().map(|generator| generator.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("generators", &self.ids())
            .finish()
    }
}
