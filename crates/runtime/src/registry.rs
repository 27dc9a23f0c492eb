//! Named component constructors.
//!
//! Experiment files name their hosts, end types and persons by a string
//! key. The [`Registry`] maps each key to a constructor taking the
//! component's parameters, and restores hosts and end types from the
//! `{class, state}` pairs stored in snapshots.

use crate::ComponentState;
use ccore::{
    BatchedPerson, EndType, Error, Host, MessageCount, Person, RandomHost, Result, RoundRobin,
    Unanimity,
};
use compact_str::CompactString;
use persons::{AutoBatch, BackendPerson, Backends, Scripted};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use std::{collections::BTreeMap, sync::Arc};

/// Component parameters: every key of a component entry except `class`.
pub type Params = serde_json::Map<String, Value>;

/// Builds a host for a roster of the given size.
pub type HostBuilder = Arc<dyn Fn(&Params, usize) -> Result<Box<dyn Host>> + Send + Sync>;

/// Builds an end type.
pub type EndTypeBuilder = Arc<dyn Fn(&Params) -> Result<Box<dyn EndType>> + Send + Sync>;

/// Builds a single-lane person.
pub type PersonBuilder = Arc<dyn Fn(&Params, &Backends) -> Result<Box<dyn Person>> + Send + Sync>;

/// Builds a batched person.
pub type BatchedBuilder =
    Arc<dyn Fn(&Params, &Backends) -> Result<Box<dyn BatchedPerson>> + Send + Sync>;

/// Rebuilds a component from its snapshot state.
pub type Restorer<T> = Arc<dyn Fn(Value) -> Result<Box<T>> + Send + Sync>;

/// String key to constructor tables.
#[derive(Clone)]
pub struct Registry {
    hosts: BTreeMap<CompactString, (HostBuilder, Restorer<dyn Host>)>,
    end_types: BTreeMap<CompactString, (EndTypeBuilder, Restorer<dyn EndType>)>,
    persons: BTreeMap<CompactString, PersonBuilder>,
    batched: BTreeMap<CompactString, BatchedBuilder>,
    aliases: BTreeMap<CompactString, CompactString>,
}

impl Registry {
    /// A registry without any component.
    pub fn empty() -> Self {
        Self {
            hosts: BTreeMap::new(),
            end_types: BTreeMap::new(),
            persons: BTreeMap::new(),
            batched: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }

    /// Register a host.
    ///
    /// Hosts must report `name` from [`Host::name`] so snapshots restore
    /// through the same entry.
    pub fn register_host<B, R>(&mut self, name: impl Into<CompactString>, build: B, restore: R)
    where
        B: Fn(&Params, usize) -> Result<Box<dyn Host>> + Send + Sync + 'static,
        R: Fn(Value) -> Result<Box<dyn Host>> + Send + Sync + 'static,
    {
        self.hosts
            .insert(name.into(), (Arc::new(build), Arc::new(restore)));
    }

    /// Register an end type, see [`Registry::register_host`].
    pub fn register_end_type<B, R>(&mut self, name: impl Into<CompactString>, build: B, restore: R)
    where
        B: Fn(&Params) -> Result<Box<dyn EndType>> + Send + Sync + 'static,
        R: Fn(Value) -> Result<Box<dyn EndType>> + Send + Sync + 'static,
    {
        self.end_types
            .insert(name.into(), (Arc::new(build), Arc::new(restore)));
    }

    /// Register a single-lane person.
    pub fn register_person<B>(&mut self, name: impl Into<CompactString>, build: B)
    where
        B: Fn(&Params, &Backends) -> Result<Box<dyn Person>> + Send + Sync + 'static,
    {
        self.persons.insert(name.into(), Arc::new(build));
    }

    /// Register a batched person.
    pub fn register_batched<B>(&mut self, name: impl Into<CompactString>, build: B)
    where
        B: Fn(&Params, &Backends) -> Result<Box<dyn BatchedPerson>> + Send + Sync + 'static,
    {
        self.batched.insert(name.into(), Arc::new(build));
    }

    /// Make `alias` resolve to the component registered as `name`.
    pub fn alias(&mut self, alias: impl Into<CompactString>, name: impl Into<CompactString>) {
        self.aliases.insert(alias.into(), name.into());
    }

    /// The registry key `class` resolves to.
    pub fn resolve<'a>(&'a self, class: &'a str) -> &'a str {
        self.aliases.get(class).map_or(class, CompactString::as_str)
    }

    /// Build the host registered as `class` for `persons` participants.
    pub fn build_host(&self, class: &str, params: &Params, persons: usize) -> Result<Box<dyn Host>> {
        let (build, _) = lookup(&self.hosts, "host", self.resolve(class))?;
        build(params, persons)
    }

    /// Rebuild a host from snapshot state.
    pub fn restore_host(&self, state: &ComponentState) -> Result<Box<dyn Host>> {
        let (_, restore) = lookup(&self.hosts, "host", self.resolve(&state.class))?;
        restore(state.state.clone())
    }

    /// Build the end type registered as `class`.
    pub fn build_end_type(&self, class: &str, params: &Params) -> Result<Box<dyn EndType>> {
        let (build, _) = lookup(&self.end_types, "end type", self.resolve(class))?;
        build(params)
    }

    /// Rebuild an end type from snapshot state.
    pub fn restore_end_type(&self, state: &ComponentState) -> Result<Box<dyn EndType>> {
        let (_, restore) = lookup(&self.end_types, "end type", self.resolve(&state.class))?;
        restore(state.state.clone())
    }

    /// Build the single-lane person registered as `class`.
    pub fn build_person(
        &self,
        class: &str,
        params: &Params,
        backends: &Backends,
    ) -> Result<Box<dyn Person>> {
        let build = lookup(&self.persons, "person", self.resolve(class))?;
        build(params, backends)
    }

    /// Whether `class` names a batched person.
    pub fn is_batched(&self, class: &str) -> bool {
        self.batched.contains_key(self.resolve(class))
    }

    /// Build the batched person registered as `class`.
    pub fn build_batched(
        &self,
        class: &str,
        params: &Params,
        backends: &Backends,
    ) -> Result<Box<dyn BatchedPerson>> {
        let build = lookup(&self.batched, "batched person", self.resolve(class))?;
        build(params, backends)
    }

    /// Build one single-lane person per entry of `lanes` and wrap them in
    /// an [`AutoBatch`] tagged `tag`.
    ///
    /// Each lane's parameters are `shared` overridden by that lane's map.
    pub fn build_auto_batch(
        &self,
        class: &str,
        tag: impl Into<CompactString>,
        shared: &Params,
        lanes: &[Params],
        backends: &Backends,
    ) -> Result<Box<dyn BatchedPerson>> {
        let mut persons = Vec::with_capacity(lanes.len());
        for overrides in lanes {
            let mut params = shared.clone();
            params.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
            persons.push(self.build_person(class, &params, backends)?);
        }
        Ok(Box::new(AutoBatch::new(tag, persons)?))
    }
}

impl Default for Registry {
    /// A registry holding the built-in components.
    fn default() -> Self {
        let mut registry = Self::empty();

        registry.register_host(
            RoundRobin::NAME,
            |params, persons| {
                let p: RoundRobinParams = parse(RoundRobin::NAME, params)?;
                Ok(Box::new(RoundRobin::with_skip(
                    persons,
                    p.start_person_index,
                    p.skip,
                )?))
            },
            |state| Ok(Box::new(RoundRobin::restore(state)?)),
        );
        registry.register_host(
            RandomHost::NAME,
            |params, persons| {
                let p: RandomParams = parse(RandomHost::NAME, params)?;
                Ok(Box::new(RandomHost::new(
                    persons,
                    p.start_person_index,
                    p.seed,
                )?))
            },
            |state| Ok(Box::new(RandomHost::restore(state)?)),
        );
        registry.alias("Round Robin Host", RoundRobin::NAME);
        registry.alias("Random Host", RandomHost::NAME);

        registry.register_end_type(
            MessageCount::NAME,
            |params| {
                let p: IterationParams = parse(MessageCount::NAME, params)?;
                Ok(Box::new(
                    MessageCount::new(p.max_num_msgs).start_at(p.start_iteration),
                ))
            },
            |state| Ok(Box::new(MessageCount::restore(state)?)),
        );
        registry.register_end_type(
            Unanimity::NAME,
            |params| {
                let p: UnanimityParams = parse(Unanimity::NAME, params)?;
                Ok(Box::new(Unanimity::new(p.max_num_msgs)))
            },
            |state| Ok(Box::new(Unanimity::restore(state)?)),
        );
        registry.alias("Iteration End Type", MessageCount::NAME);
        registry.alias("Unanimity End Type", Unanimity::NAME);

        registry.register_person(Scripted::NAME, |params, _| {
            let p: ScriptedParams = parse(Scripted::NAME, params)?;
            Ok(Box::new(Scripted::new(p.name, p.things_to_say)))
        });
        registry.register_person(BackendPerson::NAME, |params, backends| {
            let p: BackendParams = parse(BackendPerson::NAME, params)?;
            Ok(Box::new(BackendPerson::from_backends(
                p.name,
                p.background_story,
                backends,
                &p.backend,
            )?))
        });
        registry.alias("fake_person", Scripted::NAME);

        registry
    }
}

fn lookup<'a, T>(
    table: &'a BTreeMap<CompactString, T>,
    kind: &str,
    class: &str,
) -> Result<&'a T> {
    table
        .get(class)
        .ok_or_else(|| Error::config(format!("unknown {kind} class '{class}'")))
}

fn parse<T: DeserializeOwned>(class: &str, params: &Params) -> Result<T> {
    serde_json::from_value(Value::Object(params.clone()))
        .map_err(|e| Error::config(format!("invalid parameters for '{class}': {e}")))
}

#[derive(Deserialize)]
struct RoundRobinParams {
    #[serde(default)]
    start_person_index: usize,
    #[serde(default = "default_skip")]
    skip: usize,
}

fn default_skip() -> usize {
    1
}

#[derive(Deserialize)]
struct RandomParams {
    #[serde(default)]
    start_person_index: usize,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize)]
struct IterationParams {
    max_num_msgs: usize,
    #[serde(default)]
    start_iteration: usize,
}

#[derive(Deserialize)]
struct UnanimityParams {
    max_num_msgs: usize,
}

#[derive(Deserialize)]
struct ScriptedParams {
    name: CompactString,
    #[serde(alias = "script")]
    things_to_say: Vec<Option<String>>,
}

#[derive(Deserialize)]
struct BackendParams {
    name: CompactString,
    #[serde(default)]
    background_story: String,
    backend: String,
}
