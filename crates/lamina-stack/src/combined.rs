//! Combined reflectance/transmittance + field engine.

use std::sync::Arc;

use lamina_core::engine::{
    Engine, EngineError, EngineOutput, QueryKind, FIELD_VARIABLES, RT_VARIABLES,
};
use lamina_core::material::IndexComponent;
use lamina_core::structure::Multilayer;

use crate::ensure_variables;
use crate::session::{FieldWindow, StackSession};

/// Every variable a combined query guarantees across both records.
pub const COMBINED_VARIABLES: [&str; 12] = [
    "rs", "rp", "ts", "tp", "Rs", "Rp", "Ts", "Tp", "Es", "Ep", "Hs", "Hp",
];

/// Issues the RT query and the field query against one shared session in a
/// single `run`, returning a fixed-arity-2 output.
///
/// The two queries are sequential; the session sees at most one in flight.
pub struct StackRtField {
    session: Arc<dyn StackSession>,
    window: FieldWindow,
    component: IndexComponent,
    name: String,
}

impl StackRtField {
    pub fn new(session: Arc<dyn StackSession>) -> Self {
        let name = format!("{}.stack", session.name());
        Self {
            session,
            window: FieldWindow::default(),
            component: IndexComponent::default(),
            name,
        }
    }

    /// Combined engine with an explicit field sampling window.
    pub fn with_window(
        session: Arc<dyn StackSession>,
        window: FieldWindow,
    ) -> Result<Self, EngineError> {
        window.validate()?;
        let mut engine = Self::new(session);
        engine.window = window;
        Ok(engine)
    }
}

impl Engine for StackRtField {
    fn name(&self) -> &str {
        &self.name
    }

    fn query_kind(&self) -> QueryKind {
        QueryKind::Combined
    }

    fn variables(&self) -> &[&str] {
        &COMBINED_VARIABLES
    }

    fn run(
        &self,
        structure: &Multilayer,
        frequencies: &[f64],
        angles_deg: &[f64],
    ) -> Result<EngineOutput, EngineError> {
        let index = structure.index_profile(frequencies, self.component);
        let thickness = structure.thicknesses();

        let rt = self
            .session
            .stackrt(&index, &thickness, frequencies, angles_deg)?;
        ensure_variables(&rt, &RT_VARIABLES)?;

        let field =
            self.session
                .stackfield(&index, &thickness, frequencies, angles_deg, &self.window)?;
        ensure_variables(&field, &FIELD_VARIABLES)?;

        Ok(EngineOutput::RtField(rt, field))
    }
}
