//! Execution context passed to emission models.
//!
//! [`EmissionContext`] bundles the collaborators one emitter touches in
//! one step: its species (append only), the field interpolator (read
//! only), the field's bound-charge buffer, the current accumulator, the
//! grid and one RNG stream. Every particle enters the simulation through
//! [`EmissionContext::inject`], which is where charge conservation is
//! enforced for all models.

use cathode_core::{
    Accumulator, ChargeField, ComponentId, EmissionError, FieldSample, Grid, Interpolator,
    Particle, Species,
};

use crate::rng::EmissionRng;

/// Execution context for one emitter's `emit()` call.
///
/// Uses dynamic dispatch throughout so that [`Emit`](crate::Emit) stays
/// object-safe and models can be tested against mocks.
pub struct EmissionContext<'a> {
    species: &'a mut dyn Species,
    interpolator: &'a dyn Interpolator,
    field: &'a mut dyn ChargeField,
    accumulator: &'a mut dyn Accumulator,
    grid: &'a dyn Grid,
    rng: &'a mut EmissionRng,
}

impl<'a> EmissionContext<'a> {
    /// Construct a new emission context.
    ///
    /// Typically called by [`EmitterRegistry::emit_all`](crate::EmitterRegistry::emit_all).
    /// For testing, construct with the mocks from `cathode-test-utils`.
    pub fn new(
        species: &'a mut dyn Species,
        interpolator: &'a dyn Interpolator,
        field: &'a mut dyn ChargeField,
        accumulator: &'a mut dyn Accumulator,
        grid: &'a dyn Grid,
        rng: &'a mut EmissionRng,
    ) -> Self {
        Self {
            species,
            interpolator,
            field,
            accumulator,
            grid,
            rng,
        }
    }

    /// The species being emitted.
    pub fn species(&self) -> &dyn Species {
        self.species
    }

    /// Grid topology and constants.
    pub fn grid(&self) -> &dyn Grid {
        self.grid
    }

    /// The RNG stream for this execution context.
    pub fn rng(&mut self) -> &mut EmissionRng {
        self.rng
    }

    /// Field at the centre of `component`.
    ///
    /// # Errors
    ///
    /// [`EmissionError::ComponentOutOfRange`] if the component's cell is
    /// not covered by the interpolator or its type code is reserved.
    pub fn sample_field(&self, component: ComponentId) -> Result<FieldSample, EmissionError> {
        let centre = component
            .component_type()
            .offsets()
            .map(|o| [f32::from(o[0]), f32::from(o[1]), f32::from(o[2])]);
        centre
            .and_then(|c| self.interpolator.sample(component.cell(), c))
            .ok_or(EmissionError::ComponentOutOfRange { component })
    }

    /// Append `particle` to the species and deposit its charge.
    ///
    /// The accumulator receives the particle's current (`q` moving at
    /// its velocity times `cvac`) and the field's bound-charge buffer
    /// receives `-q`, the image charge left on the emitting surface.
    /// Nothing is deposited if the append fails.
    ///
    /// # Errors
    ///
    /// [`EmissionError::SpeciesFull`] from the species.
    pub fn inject(&mut self, particle: Particle) -> Result<(), EmissionError> {
        self.species.append(particle)?;
        let c = self.grid.cvac();
        let v = particle.velocity();
        self.accumulator
            .scatter(particle.i, particle.q, [v[0] * c, v[1] * c, v[2] * c]);
        self.field.deposit_rhob(particle.i, -particle.q);
        Ok(())
    }
}
