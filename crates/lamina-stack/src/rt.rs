//! Reflectance/transmittance engine.

use std::sync::Arc;

use lamina_core::engine::{Engine, EngineError, EngineOutput, QueryKind, RT_VARIABLES};
use lamina_core::material::IndexComponent;
use lamina_core::structure::Multilayer;

use crate::ensure_variables;
use crate::session::StackSession;

/// Thin wrapper around a session's reflection/transmission query.
///
/// Evaluates the structure's index profile over the requested frequencies,
/// hands the whole sweep to the session in one call, and verifies the
/// returned record carries every RT variable.
pub struct StackRt {
    session: Arc<dyn StackSession>,
    component: IndexComponent,
    name: String,
}

impl StackRt {
    pub fn new(session: Arc<dyn StackSession>) -> Self {
        let name = format!("{}.stackrt", session.name());
        Self {
            session,
            component: IndexComponent::default(),
            name,
        }
    }

    /// Select the principal index component used for anisotropic media.
    pub fn with_component(mut self, component: IndexComponent) -> Self {
        self.component = component;
        self
    }
}

impl Engine for StackRt {
    fn name(&self) -> &str {
        &self.name
    }

    fn query_kind(&self) -> QueryKind {
        QueryKind::ReflectionTransmission
    }

    fn variables(&self) -> &[&str] {
        &RT_VARIABLES
    }

    fn run(
        &self,
        structure: &Multilayer,
        frequencies: &[f64],
        angles_deg: &[f64],
    ) -> Result<EngineOutput, EngineError> {
        let index = structure.index_profile(frequencies, self.component);
        let thickness = structure.thicknesses();
        log::debug!(
            "{}: {} layers, {} frequencies, {} angles",
            self.name,
            structure.len(),
            frequencies.len(),
            angles_deg.len()
        );
        let record = self
            .session
            .stackrt(&index, &thickness, frequencies, angles_deg)?;
        ensure_variables(&record, self.variables())?;
        Ok(EngineOutput::Rt(record))
    }
}
