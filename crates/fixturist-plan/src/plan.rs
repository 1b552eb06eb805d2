use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use fixturist_core::Value;

use crate::constraints::FieldConstraint;
use crate::directives::{FieldHandler, FieldSetter, MapSetter};
use crate::run::{PlanRun, RunPolicy};
use crate::sequence::Sequence;

/// Default number of attempts made to satisfy a constraint before failing.
pub const DEFAULT_CONSTRAINT_RETRY_ATTEMPTS: u32 = 40;

/// Directives for one generation run, keyed by qualified field path.
///
/// Plans are cheap to clone: directive payloads are shared, including the
/// cursors of across sequences. Every setter overwrites the previous entry
/// for its path, except map key/value sequences which fill their own half of
/// the same [`MapSetter`].
#[derive(Clone)]
pub struct Plan {
    omitted: HashSet<String>,
    ensured: HashMap<String, FieldSetter>,
    handlers: HashMap<String, FieldHandler>,
    constraints: HashMap<String, Rc<dyn FieldConstraint>>,
    map_setters: HashMap<String, MapSetter>,
    field_item_counts: HashMap<String, RunPolicy>,
    item_count: RunPolicy,
    parent_path: String,
    max_constraint_retries: u32,
    invalid_directives: Vec<String>,
    last_run: Rc<Cell<Option<PlanRun>>>,
    map_runs: Rc<RefCell<HashMap<String, PlanRun>>>,
}

impl Plan {
    pub fn new() -> Self {
        Self {
            omitted: HashSet::new(),
            ensured: HashMap::new(),
            handlers: HashMap::new(),
            constraints: HashMap::new(),
            map_setters: HashMap::new(),
            field_item_counts: HashMap::new(),
            item_count: RunPolicy::default(),
            parent_path: String::new(),
            max_constraint_retries: DEFAULT_CONSTRAINT_RETRY_ATTEMPTS,
            invalid_directives: Vec::new(),
            last_run: Rc::new(Cell::new(None)),
            map_runs: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn omit(&mut self, path: impl Into<String>) {
        self.omitted.insert(path.into());
    }

    pub fn fix(&mut self, path: impl Into<String>, value: Value) {
        self.ensured.insert(path.into(), FieldSetter::Fixed(value));
    }

    pub fn fix_via(&mut self, path: impl Into<String>, sub_generator: Plan) {
        self.ensured
            .insert(path.into(), FieldSetter::SubGenerator(Rc::new(sub_generator)));
    }

    /// Values addressed by item index; items past the end keep their zero value.
    pub fn sequence(&mut self, path: impl Into<String>, values: Vec<Value>) {
        self.ensured
            .insert(path.into(), FieldSetter::Sequence(Sequence::by_index(values)));
    }

    /// Values addressed by a counter shared by every use of the path.
    pub fn sequence_across(&mut self, path: impl Into<String>, values: Vec<Value>) {
        self.ensured
            .insert(path.into(), FieldSetter::Sequence(Sequence::across(values)));
    }

    pub fn map_key_sequence(&mut self, path: impl Into<String>, values: Vec<Value>) {
        self.map_setters.entry(path.into()).or_default().keys = Some(Sequence::by_index(values));
    }

    pub fn map_value_sequence(&mut self, path: impl Into<String>, values: Vec<Value>) {
        self.map_setters.entry(path.into()).or_default().values =
            Some(Sequence::by_index(values));
    }

    pub fn constrain(
        &mut self,
        path: impl Into<String>,
        constraint: impl FieldConstraint + 'static,
    ) {
        self.constraints.insert(path.into(), Rc::new(constraint));
    }

    pub fn on_field(&mut self, path: impl Into<String>, handler: FieldHandler) {
        self.handlers.insert(path.into(), handler);
    }

    pub fn set_item_count(&mut self, policy: RunPolicy) {
        self.item_count = policy;
    }

    /// Entry-count policy for a map field, also used as the element count of
    /// a sequence field built without an explicit sub-generator.
    pub fn set_map_item_count(&mut self, path: impl Into<String>, policy: RunPolicy) {
        self.field_item_counts.insert(path.into(), policy);
    }

    pub fn set_max_constraint_retries(&mut self, attempts: u32) {
        self.max_constraint_retries = attempts;
    }

    pub fn set_parent_path(&mut self, path: impl Into<String>) {
        self.parent_path = path.into();
    }

    /// Remember a directive that could not be registered; the run refuses to
    /// start while any are recorded.
    pub fn record_invalid_directive(&mut self, message: impl Into<String>) {
        self.invalid_directives.push(message.into());
    }

    /// Copy every path-keyed directive of `parent` that this plan does not
    /// already define for the same path.
    pub fn copy_from(&mut self, parent: &Plan) {
        self.omitted.extend(parent.omitted.iter().cloned());
        for (path, setter) in &parent.ensured {
            self.ensured
                .entry(path.clone())
                .or_insert_with(|| setter.clone());
        }
        for (path, handler) in &parent.handlers {
            self.handlers
                .entry(path.clone())
                .or_insert_with(|| Rc::clone(handler));
        }
        for (path, constraint) in &parent.constraints {
            self.constraints
                .entry(path.clone())
                .or_insert_with(|| Rc::clone(constraint));
        }
        for (path, setter) in &parent.map_setters {
            let entry = self.map_setters.entry(path.clone()).or_default();
            if entry.keys.is_none() {
                entry.keys = setter.keys.clone();
            }
            if entry.values.is_none() {
                entry.values = setter.values.clone();
            }
        }
        for (path, policy) in &parent.field_item_counts {
            self.field_item_counts.entry(path.clone()).or_insert(*policy);
        }
    }

    /// Plan for a nested record reached at `path`: a fresh single-item plan
    /// carrying this plan's directives and retry ceiling.
    pub fn nested_record_plan(&self, path: &str) -> Plan {
        let mut child = Plan::new();
        child.set_parent_path(path);
        child.set_max_constraint_retries(self.max_constraint_retries);
        child.copy_from(self);
        child.map_runs = Rc::clone(&self.map_runs);
        child
    }

    /// Plan for running `sub_generator` at `path`. The sub-generator's own
    /// directives win over inherited ones on the same path.
    pub fn sub_generator_plan(&self, sub_generator: &Plan, path: &str) -> Plan {
        let mut child = sub_generator.clone();
        child.set_parent_path(path);
        child.copy_from(self);
        child.map_runs = Rc::clone(&self.map_runs);
        child
    }

    pub fn is_omitted(&self, path: &str) -> bool {
        self.omitted.contains(path)
    }

    pub fn setter(&self, path: &str) -> Option<&FieldSetter> {
        self.ensured.get(path)
    }

    pub fn handler(&self, path: &str) -> Option<&FieldHandler> {
        self.handlers.get(path)
    }

    pub fn constraint(&self, path: &str) -> Option<&dyn FieldConstraint> {
        self.constraints.get(path).map(|constraint| constraint.as_ref())
    }

    pub fn map_setter(&self, path: &str) -> Option<&MapSetter> {
        self.map_setters.get(path)
    }

    pub fn item_count(&self) -> RunPolicy {
        self.item_count
    }

    pub fn map_item_count(&self, path: &str) -> Option<RunPolicy> {
        self.field_item_counts.get(path).copied()
    }

    pub fn parent_path(&self) -> &str {
        &self.parent_path
    }

    pub fn max_constraint_retries(&self) -> u32 {
        self.max_constraint_retries
    }

    pub fn invalid_directives(&self) -> &[String] {
        &self.invalid_directives
    }

    /// Item count resolved by the most recent run of this plan.
    pub fn last_run(&self) -> Option<PlanRun> {
        self.last_run.get()
    }

    pub fn record_run(&self, run: PlanRun) {
        self.last_run.set(Some(run));
    }

    /// Entry count drawn for the map at `path` by the most recent run.
    ///
    /// Child plans report into the store of the plan they were built from,
    /// so the root plan sees every map the run reached, keyed by qualified
    /// path. The last map generated at a path wins.
    pub fn map_last_run(&self, path: &str) -> Option<PlanRun> {
        self.map_runs.borrow().get(path).copied()
    }

    pub fn record_map_run(&self, path: impl Into<String>, run: PlanRun) {
        self.map_runs.borrow_mut().insert(path.into(), run);
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<&String> = self.handlers.keys().collect();
        handlers.sort();

        f.debug_struct("Plan")
            .field("parent_path", &self.parent_path)
            .field("item_count", &self.item_count)
            .field("omitted", &self.omitted)
            .field("ensured", &self.ensured)
            .field("handlers", &handlers)
            .field("constraints", &self.constraints)
            .field("map_setters", &self.map_setters)
            .field("field_item_counts", &self.field_item_counts)
            .field("max_constraint_retries", &self.max_constraint_retries)
            .finish()
    }
}
