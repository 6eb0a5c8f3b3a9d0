//! A named emitter: a component list bound to a species and a model.

use std::collections::HashSet;

use cathode_core::{ComponentId, EmissionError, Grid, RegistryError, SpeciesId};

use crate::context::EmissionContext;
use crate::model::{Emit, EmissionModel, EmissionReport};

/// One registered emitter.
///
/// Owns its component list, which never grows past the `max_component`
/// fixed at registration. The species is referenced by id and resolved
/// at emission time.
#[derive(Clone, Debug)]
pub struct Emitter {
    name: String,
    species: SpeciesId,
    model: EmissionModel,
    components: Vec<ComponentId>,
    max_component: usize,
    index: usize,
}

impl Emitter {
    pub(crate) fn new(
        name: String,
        species: SpeciesId,
        model: EmissionModel,
        max_component: usize,
        index: usize,
    ) -> Self {
        Self {
            name,
            species,
            model,
            components: Vec::with_capacity(max_component.min(4096)),
            max_component,
            index,
        }
    }

    /// Unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Species this emitter injects into.
    pub fn species(&self) -> SpeciesId {
        self.species
    }

    /// Bound emission model.
    pub fn model(&self) -> &EmissionModel {
        &self.model
    }

    /// Components in emission order.
    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }

    /// Number of components currently bound.
    pub fn n_component(&self) -> usize {
        self.components.len()
    }

    /// Fixed capacity of the component list.
    pub fn max_component(&self) -> usize {
        self.max_component
    }

    /// Registration position, starting at 0.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Append one component.
    ///
    /// # Errors
    ///
    /// [`RegistryError::CapacityExceeded`] if the list is already full;
    /// the list is unchanged.
    pub fn add_component(&mut self, id: ComponentId) -> Result<(), RegistryError> {
        if self.components.len() >= self.max_component {
            return Err(RegistryError::CapacityExceeded {
                name: self.name.clone(),
                max_component: self.max_component,
            });
        }
        self.components.push(id);
        Ok(())
    }

    /// Append components in order, stopping at the first failure.
    ///
    /// Components appended before the failure stay appended.
    pub fn extend_components(
        &mut self,
        ids: impl IntoIterator<Item = ComponentId>,
    ) -> Result<(), RegistryError> {
        for id in ids {
            self.add_component(id)?;
        }
        Ok(())
    }

    /// Check the component list against `grid`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidComponent`] for a reserved type code or a
    ///   cell outside the grid.
    /// - [`RegistryError::DuplicateComponent`] for an id listed twice.
    pub fn validate(&self, grid: &dyn Grid) -> Result<(), RegistryError> {
        let mut seen = HashSet::with_capacity(self.components.len());
        for &component in &self.components {
            if component.component_type().is_reserved()
                || component.cell() as usize >= grid.cell_count()
            {
                return Err(RegistryError::InvalidComponent {
                    name: self.name.clone(),
                    component,
                });
            }
            if !seen.insert(component) {
                return Err(RegistryError::DuplicateComponent {
                    name: self.name.clone(),
                    component,
                });
            }
        }
        Ok(())
    }

    /// Run the bound model over this emitter's components.
    pub fn emit(&self, ctx: &mut EmissionContext<'_>) -> Result<EmissionReport, EmissionError> {
        self.model.emit(&self.components, ctx)
    }
}
