//! Registry of maps and global overlays
//!
//! The registry owns every [`MapDefinition`] of one viewer, in registration
//! order, plus the overlays shown on all of them. Exactly one map is active
//! once [`MapRegistry::finalize`] has run; afterwards only the coordinator
//! moves the active flag.

use crate::{
    core::{
        config::{ConfigError, ViewerConfig},
        definition::{MapDefinition, MapPlan},
        viewport::LayerFactory,
    },
    layers::overlay::{OverlayBuilder, OverlayDescriptor, OverlayPlan},
    prelude::HashSet,
    LookupError,
};

#[derive(Debug, Default)]
pub struct MapRegistry {
    maps: Vec<MapDefinition>,
    global_overlays: Vec<OverlayDescriptor>,
    globals_registered: bool,
}

impl MapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a whole document, then builds the registry from it.
    ///
    /// Nothing is created through `factory` unless every map and marker is
    /// valid. The first map is active on return.
    pub fn from_config(
        config: &ViewerConfig,
        factory: &mut dyn LayerFactory,
    ) -> Result<Self, ConfigError> {
        let plans = config
            .map_entries()
            .iter()
            .map(MapPlan::from_config)
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::default();
        for plan in &plans {
            if !seen.insert(plan.name.as_str()) {
                return Err(ConfigError::DuplicateMapName(plan.name.clone()));
            }
        }

        let globals = OverlayBuilder::validate(&config.markers)?;

        let mut registry = Self::new();
        for plan in plans {
            registry.register(plan, factory)?;
        }
        registry.register_global_overlays(globals, factory)?;
        registry.finalize()?;

        #[cfg(feature = "debug")]
        log::info!(
            "Registered {} map(s) and {} global overlay(s)",
            registry.len(),
            registry.global_overlays().len()
        );

        Ok(registry)
    }

    /// Materializes and appends a map. Names must be unique.
    pub fn register(
        &mut self,
        plan: MapPlan,
        factory: &mut dyn LayerFactory,
    ) -> Result<&MapDefinition, ConfigError> {
        if self.maps.iter().any(|map| map.name() == plan.name) {
            return Err(ConfigError::DuplicateMapName(plan.name));
        }

        #[cfg(feature = "debug")]
        log::debug!(
            "Registering map {:?} with {} overlay(s)",
            plan.name,
            plan.overlays.len()
        );

        let index = self.maps.len();
        self.maps.push(plan.materialize(factory));
        Ok(&self.maps[index])
    }

    /// Sets the overlays shown on every map.
    ///
    /// May be called once per registry; a second call is rejected rather
    /// than replacing or merging the first set.
    pub fn register_global_overlays(
        &mut self,
        plans: Vec<OverlayPlan>,
        factory: &mut dyn LayerFactory,
    ) -> Result<(), ConfigError> {
        if self.globals_registered {
            return Err(ConfigError::GlobalOverlaysAlreadySet);
        }
        self.global_overlays = OverlayBuilder::materialize(plans, factory);
        self.globals_registered = true;
        Ok(())
    }

    /// Marks the first registered map active. Fails when no map exists.
    pub fn finalize(&mut self) -> Result<(), ConfigError> {
        if self.maps.is_empty() {
            return Err(ConfigError::NoMaps);
        }
        for (index, map) in self.maps.iter_mut().enumerate() {
            map.set_active(index == 0);
        }
        Ok(())
    }

    pub fn find_by_name(&self, name: &str) -> Result<&MapDefinition, LookupError> {
        self.index_of(name).map(|index| &self.maps[index])
    }

    pub(crate) fn index_of(&self, name: &str) -> Result<usize, LookupError> {
        self.maps
            .iter()
            .position(|map| map.name() == name)
            .ok_or_else(|| LookupError::UnknownMap(name.to_string()))
    }

    pub fn active_map(&self) -> Result<&MapDefinition, LookupError> {
        self.active_index().map(|index| &self.maps[index])
    }

    pub(crate) fn active_index(&self) -> Result<usize, LookupError> {
        let mut active = self.maps.iter().enumerate().filter(|(_, map)| map.is_active());
        match (active.next(), active.next()) {
            (Some((index, _)), None) => Ok(index),
            _ => Err(LookupError::NoActiveMap),
        }
    }

    /// Moves the active flag from `from` to `to`.
    pub(crate) fn switch_active(&mut self, from: usize, to: usize) {
        self.maps[from].set_active(false);
        self.maps[to].set_active(true);
    }

    pub fn maps(&self) -> &[MapDefinition] {
        &self.maps
    }

    pub(crate) fn map_at(&self, index: usize) -> &MapDefinition {
        &self.maps[index]
    }

    pub fn global_overlays(&self) -> &[OverlayDescriptor] {
        &self.global_overlays
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
