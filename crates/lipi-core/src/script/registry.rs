use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::{debug, debug_span};

use super::{parse_script_toml, ScriptDefinition, ScriptIndex, ScriptListData};
use crate::error::{LipiError, Result};
use crate::krama::KramaModel;

/// Cache cell for one script. `load` serialises the first parse so
/// concurrent callers share one result; readers never take the lock once
/// `value` is set.
#[derive(Default)]
struct Slot {
    value: OnceLock<Arc<ScriptDefinition>>,
    load: Mutex<()>,
}

/// Resolves script names and memoises parsed definitions.
///
/// Every known script gets a slot at construction, so the slot map itself
/// never changes and unrelated scripts never contend for a lock.
pub struct ScriptRegistry {
    index: &'static ScriptIndex,
    slots: HashMap<&'static str, Slot>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        let index = ScriptIndex::global();
        let slots = index.names().map(|name| (name, Slot::default())).collect();
        Self { index, slots }
    }

    /// Process-wide registry shared by the free-standing API.
    pub fn global() -> &'static ScriptRegistry {
        static INSTANCE: OnceLock<ScriptRegistry> = OnceLock::new();
        INSTANCE.get_or_init(ScriptRegistry::new)
    }

    /// Canonical script names, in index order.
    pub fn known_scripts(&self) -> Vec<&'static str> {
        self.index.names().collect()
    }

    /// Language names that resolve to a script, in index order.
    pub fn known_languages(&self) -> Vec<&'static str> {
        self.index.languages()
    }

    pub fn script_list_data(&self) -> ScriptListData {
        self.index.list_data()
    }

    pub fn normalize(&self, name: &str) -> Result<&'static str> {
        self.index
            .normalize(name)
            .ok_or_else(|| LipiError::NotFound(name.to_string()))
    }

    /// Load a script eagerly. A no-op when it is already cached.
    pub fn preload(&self, name: &str) -> Result<()> {
        self.get(name).map(|_| ())
    }

    pub fn get(&self, name: &str) -> Result<Arc<ScriptDefinition>> {
        let canonical = self.normalize(name)?;
        let slot = self
            .slots
            .get(canonical)
            .ok_or_else(|| LipiError::NotFound(name.to_string()))?;
        if let Some(def) = slot.value.get() {
            return Ok(Arc::clone(def));
        }

        let _guard = slot.load.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(def) = slot.value.get() {
            return Ok(Arc::clone(def));
        }

        let _span = debug_span!("load_script", script = canonical).entered();
        let (file, source) = self
            .index
            .source(canonical)
            .ok_or_else(|| LipiError::data(canonical, "no embedded table"))?;
        let def = Arc::new(parse_script_toml(file, source, KramaModel::global())?);
        debug!(
            krama = def.krama().len(),
            specific = def.specific().len(),
            max_typing_input = def.max_typing_input_chars()
        );
        // Only this thread can set the cell while the guard is held.
        let _ = slot.value.set(Arc::clone(&def));
        Ok(def)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.index
            .normalize(name)
            .and_then(|canonical| self.slots.get(canonical))
            .is_some_and(|slot| slot.value.get().is_some())
    }

    /// Drop every cached definition. Later calls load afresh.
    pub fn reset(&mut self) {
        for slot in self.slots.values_mut() {
            *slot = Slot::default();
        }
    }
}

impl Default for ScriptRegistry {
    fn default() -> Self {
        Self::new()
    }
}
