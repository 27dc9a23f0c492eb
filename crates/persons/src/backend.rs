//! Shared text-generation backends.
//!
//! Heavy backends (loaded models, API clients) are shared between
//! persons through an explicit [`Backends`] handle instead of a
//! process-wide cache. A backend is loaded once per name and released
//! when the handle is shut down.

use anyhow::Result;
use compact_str::CompactString;
use parking_lot::Mutex;
use std::{collections::BTreeMap, sync::Arc};

/// Turns a prompt into text.
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt`.
    fn generate(&self, prompt: &str) -> Result<String>;

    /// Release held resources. Called once by [`Backends::shutdown`].
    fn release(&self) {}
}

/// Named generators shared by the persons of an experiment.
///
/// Cloning the handle shares the same set of backends.
#[derive(Clone, Default)]
pub struct Backends {
    loaded: Arc<Mutex<BTreeMap<CompactString, Arc<dyn Generator>>>>,
}

impl Backends {
    /// Create an empty handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already constructed backend, replacing any previous
    /// one with the same name.
    pub fn register(&self, name: impl Into<CompactString>, generator: Arc<dyn Generator>) {
        let name = name.into();
        tracing::debug!("registered backend '{name}'");
        if let Some(previous) = self.loaded.lock().insert(name, generator) {
            previous.release();
        }
    }

    /// Get a loaded backend.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Generator>> {
        self.loaded.lock().get(name).cloned()
    }

    /// Get a backend, loading it with `load` on first use.
    ///
    /// The handle is locked while `load` runs; `load` must not use it.
    pub fn get_or_load<F>(&self, name: &str, load: F) -> Result<Arc<dyn Generator>>
    where
        F: FnOnce() -> Result<Arc<dyn Generator>>,
    {
        let mut loaded = self.loaded.lock();
        if let Some(generator) = loaded.get(name) {
            return Ok(generator.clone());
        }

        tracing::info!("loading backend '{name}'");
        let generator = load()?;
        loaded.insert(CompactString::from(name), generator.clone());
        Ok(generator)
    }

    /// Number of loaded backends.
    pub fn len(&self) -> usize {
        self.loaded.lock().len()
    }

    /// Whether no backend is loaded.
    pub fn is_empty(&self) -> bool {
        self.loaded.lock().is_empty()
    }

    /// Release every backend. Persons still holding one keep a working
    /// handle until they are dropped.
    pub fn shutdown(&self) {
        let released = std::mem::take(&mut *self.loaded.lock());
        for (name, generator) in &released {
            tracing::debug!("releasing backend '{name}'");
            generator.release();
        }
        tracing::info!("released {} backends", released.len());
    }
}
