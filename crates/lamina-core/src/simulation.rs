//! Sweep orchestration with transient overrides and a last-result cache.
//!
//! A [`Simulation`] binds one structure to one engine together with default
//! frequency and angle sweeps. Each [`simulate`](Simulation::simulate) call
//! resolves call-time overrides against those defaults, invokes the engine
//! exactly once with the full cross product, and optionally retains the raw
//! output. Overrides never persist: exploratory one-off queries leave the
//! stored defaults and, with `keep_data = false`, the cached main result
//! untouched.

use thiserror::Error;

use crate::engine::{Engine, EngineError, EngineOutput};
use crate::spectrum::convert_all;
use crate::structure::{Multilayer, StructureError};
use crate::sweep::{ParameterError, Sweep};

/// Union of the errors a simulate call can surface.
///
/// Transparent wrapping keeps the original diagnostics intact; in
/// particular, backend text inside [`EngineError`] reaches the caller
/// unmodified.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Call-time overrides for one simulate call.
///
/// `None` resolves to the simulation's stored default; a supplied value is
/// used for this call only. `keep_data` controls whether the result
/// overwrites the retained cache (default) or leaves it alone.
#[derive(Debug, Clone, Default)]
pub struct SweepRequest {
    frequencies: Option<Sweep>,
    angles: Option<Sweep>,
    keep_data: Option<bool>,
}

impl SweepRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the frequency sweep for this call only.
    pub fn frequencies(mut self, frequencies: impl Into<Sweep>) -> Self {
        self.frequencies = Some(frequencies.into());
        self
    }

    /// Override the angle sweep (degrees) for this call only.
    pub fn angles(mut self, angles: impl Into<Sweep>) -> Self {
        self.angles = Some(angles.into());
        self
    }

    /// Whether the result should replace the retained cache (default true).
    pub fn keep_data(mut self, keep: bool) -> Self {
        self.keep_data = Some(keep);
        self
    }
}

/// Orchestrates engine invocations over a frequency/angle sweep.
pub struct Simulation {
    structure: Multilayer,
    engine: Box<dyn Engine>,
    frequencies: Sweep,
    angles: Sweep,
    data: Option<EngineOutput>,
}

impl Simulation {
    /// Bind a structure and an engine with default sweeps.
    ///
    /// Scalars promote to single-element sweeps. Fails with
    /// [`ParameterError`] on an empty or invalid default sweep, before any
    /// engine resource is touched.
    pub fn new(
        structure: Multilayer,
        engine: Box<dyn Engine>,
        frequencies: impl Into<Sweep>,
        angles: impl Into<Sweep>,
    ) -> Result<Self, ParameterError> {
        let frequencies = frequencies.into();
        let angles = angles.into();
        frequencies.validate_frequencies()?;
        angles.validate("angles")?;
        Ok(Self {
            structure,
            engine,
            frequencies,
            angles,
            data: None,
        })
    }

    pub fn structure(&self) -> &Multilayer {
        &self.structure
    }

    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    /// Default frequency sweep (Hz).
    pub fn frequencies(&self) -> &[f64] {
        self.frequencies.values()
    }

    /// Default angle sweep (degrees).
    pub fn angles(&self) -> &[f64] {
        self.angles.values()
    }

    /// Vacuum wavelengths (m) derived from the default frequency sweep.
    pub fn wavelengths(&self) -> Vec<f64> {
        convert_all(self.frequencies.values())
    }

    /// Persist a new default frequency sweep.
    pub fn set_frequencies(&mut self, frequencies: impl Into<Sweep>) -> Result<(), ParameterError> {
        let frequencies = frequencies.into();
        frequencies.validate_frequencies()?;
        self.frequencies = frequencies;
        Ok(())
    }

    /// Persist a new default angle sweep (degrees).
    pub fn set_angles(&mut self, angles: impl Into<Sweep>) -> Result<(), ParameterError> {
        let angles = angles.into();
        angles.validate("angles")?;
        self.angles = angles;
        Ok(())
    }

    /// The retained raw result of the most recent call made with
    /// `keep_data = true`, if any.
    pub fn data(&self) -> Option<&EngineOutput> {
        self.data.as_ref()
    }

    /// Run the engine over the default sweeps and retain the result.
    pub fn simulate(&mut self) -> Result<EngineOutput, SimulationError> {
        self.simulate_with(SweepRequest::new())
    }

    /// Run the engine with call-time overrides.
    ///
    /// The engine is invoked exactly once with the resolved frequency and
    /// angle sequences; the whole cross product is delegated so the backend
    /// can batch it.
    pub fn simulate_with(&mut self, request: SweepRequest) -> Result<EngineOutput, SimulationError> {
        let SweepRequest {
            frequencies,
            angles,
            keep_data,
        } = request;

        if let Some(f) = &frequencies {
            f.validate_frequencies()?;
        }
        if let Some(a) = &angles {
            a.validate("angles")?;
        }

        let frequencies = frequencies.as_ref().unwrap_or(&self.frequencies);
        let angles = angles.as_ref().unwrap_or(&self.angles);

        log::debug!(
            "simulate: engine '{}', {} frequencies x {} angles",
            self.engine.name(),
            frequencies.len(),
            angles.len()
        );

        let output = self
            .engine
            .run(&self.structure, frequencies.values(), angles.values())?;

        if keep_data.unwrap_or(true) {
            self.data = Some(output.clone());
        }
        Ok(output)
    }
}
