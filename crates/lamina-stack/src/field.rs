//! Field-profile engine.

use std::sync::Arc;

use lamina_core::engine::{Engine, EngineError, EngineOutput, QueryKind, FIELD_VARIABLES};
use lamina_core::material::IndexComponent;
use lamina_core::structure::Multilayer;

use crate::ensure_variables;
use crate::session::{FieldWindow, StackSession};

/// Thin wrapper around a session's field-profile query.
///
/// Spatial sampling is controlled by a [`FieldWindow`] fixed at engine
/// construction; the window's positional-prefix constraint is validated
/// there, so a `run` never silently drops a sampling option.
pub struct StackField {
    session: Arc<dyn StackSession>,
    window: FieldWindow,
    component: IndexComponent,
    name: String,
}

impl StackField {
    /// Engine with the solver's default sampling window.
    pub fn new(session: Arc<dyn StackSession>) -> Self {
        let name = format!("{}.stackfield", session.name());
        Self {
            session,
            window: FieldWindow::default(),
            component: IndexComponent::default(),
            name,
        }
    }

    /// Engine with an explicit sampling window.
    pub fn with_window(
        session: Arc<dyn StackSession>,
        window: FieldWindow,
    ) -> Result<Self, EngineError> {
        window.validate()?;
        let mut engine = Self::new(session);
        engine.window = window;
        Ok(engine)
    }

    /// Select the principal index component used for anisotropic media.
    pub fn with_component(mut self, component: IndexComponent) -> Self {
        self.component = component;
        self
    }

    pub fn window(&self) -> &FieldWindow {
        &self.window
    }
}

impl Engine for StackField {
    fn name(&self) -> &str {
        &self.name
    }

    fn query_kind(&self) -> QueryKind {
        QueryKind::FieldProfile
    }

    fn variables(&self) -> &[&str] {
        &FIELD_VARIABLES
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
            "{}: {} layers, {} frequencies, {} angles, window {:?}",
            self.name,
            structure.len(),
            frequencies.len(),
            angles_deg.len(),
            self.window
        );
        let record =
            self.session
                .stackfield(&index, &thickness, frequencies, angles_deg, &self.window)?;
        ensure_variables(&record, self.variables())?;
        Ok(EngineOutput::Field(record))
    }
}
