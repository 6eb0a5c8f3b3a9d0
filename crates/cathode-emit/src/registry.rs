//! The emitter registry.
//!
//! Emitters are stored in an insertion-ordered map keyed by name, so
//! lookup is O(1) and iteration (and therefore emission) follows
//! registration order.

use cathode_core::{
    Accumulator, ChargeField, EmissionError, Grid, Interpolator, RegistryError, SpeciesId,
    SpeciesSet,
};
use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::{debug, instrument, trace};

use crate::context::EmissionContext;
use crate::emitter::Emitter;
use crate::model::{Emit, EmissionModel, EmissionReport};
use crate::rng::EmissionRng;

/// All emitters of one simulation.
#[derive(Clone, Debug, Default)]
pub struct EmitterRegistry {
    emitters: IndexMap<String, Emitter>,
}

impl EmitterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new emitter with an empty component list.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateName`] if `name` is taken; the existing
    ///   emitter is untouched.
    /// - [`RegistryError::InvalidCapacity`] if `max_component` is zero.
    #[instrument(skip(self, model))]
    pub fn register(
        &mut self,
        name: &str,
        species: SpeciesId,
        model: impl Into<EmissionModel>,
        max_component: usize,
    ) -> Result<&mut Emitter, RegistryError> {
        if max_component == 0 {
            return Err(RegistryError::InvalidCapacity { name: name.into() });
        }
        let index = self.emitters.len();
        match self.emitters.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateName { name: name.into() }),
            Entry::Vacant(slot) => {
                let model = model.into();
                debug!(index, model = model.name(), "emitter registered");
                Ok(slot.insert(Emitter::new(
                    name.to_owned(),
                    species,
                    model,
                    max_component,
                    index,
                )))
            }
        }
    }

    /// Look up an emitter by name.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if no emitter has that name.
    pub fn find(&self, name: &str) -> Result<&Emitter, RegistryError> {
        self.emitters
            .get(name)
            .ok_or_else(|| RegistryError::NotFound { name: name.into() })
    }

    /// Mutable lookup, e.g. to add components after registration.
    pub fn find_mut(&mut self, name: &str) -> Result<&mut Emitter, RegistryError> {
        self.emitters
            .get_mut(name)
            .ok_or_else(|| RegistryError::NotFound { name: name.into() })
    }

    /// Emitters in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Emitter> {
        self.emitters.values()
    }

    /// Number of registered emitters.
    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    /// Whether no emitter is registered.
    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    /// Validate every emitter's component list against `grid`.
    ///
    /// Stops at the first invalid emitter, in registration order.
    pub fn validate(&self, grid: &dyn Grid) -> Result<(), RegistryError> {
        self.emitters.values().try_for_each(|e| e.validate(grid))
    }

    /// Run every emitter once, in registration order, on one execution
    /// context.
    ///
    /// All emitters draw from the same `rng` stream, so the result is a
    /// deterministic function of the registry, the inputs and the
    /// stream's state.
    ///
    /// # Errors
    ///
    /// - [`EmissionError::UnknownSpecies`] if an emitter's species is not
    ///   in `species`; earlier emitters have already run.
    /// - Any error from a model, which stops the walk.
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip_all, fields(emitters = self.emitters.len()))]
    pub fn emit_all(
        &self,
        species: &mut dyn SpeciesSet,
        interpolator: &dyn Interpolator,
        field: &mut dyn ChargeField,
        accumulator: &mut dyn Accumulator,
        grid: &dyn Grid,
        rng: &mut EmissionRng,
    ) -> Result<EmissionReport, EmissionError> {
        let mut total = EmissionReport::default();
        for emitter in self.emitters.values() {
            let sp = species.species_mut(emitter.species()).ok_or_else(|| {
                EmissionError::UnknownSpecies {
                    emitter: emitter.name().to_owned(),
                    species: emitter.species(),
                }
            })?;
            let mut ctx = EmissionContext::new(sp, interpolator, field, accumulator, grid, rng);
            let report = emitter.emit(&mut ctx)?;
            trace!(
                emitter = emitter.name(),
                emitted = report.emitted,
                fired = report.components_fired,
                "emitter ran"
            );
            total.merge(&report);
        }
        debug!(
            emitted = total.emitted,
            charge = total.charge,
            "emission step complete"
        );
        Ok(total)
    }

    /// Drop every emitter, returning how many were released.
    pub fn teardown(&mut self) -> usize {
        let n = self.emitters.len();
        self.emitters.clear();
        debug!(released = n, "emitter registry torn down");
        n
    }
}
