//! TOML configuration deserialisation for multilayer jobs.

use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub sweep: SweepConfig,
    pub structure: StructureConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Default sweep parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct SweepConfig {
    /// Frequency sweep in Hz.
    pub frequencies: SweepSpec,
    /// Incidence angles in degrees (default: normal incidence).
    #[serde(default = "default_angles")]
    pub angles: SweepSpec,
}

fn default_angles() -> SweepSpec {
    SweepSpec::List { values: vec![0.0] }
}

/// Sweep specification: either a linear range or an explicit list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SweepSpec {
    Range { range: [f64; 2], points: usize },
    List { values: Vec<f64> },
}

impl SweepSpec {
    /// Materialise the sweep values.
    pub fn values(&self) -> Vec<f64> {
        match self {
            SweepSpec::Range { range, points } => {
                let [start, end] = *range;
                (0..*points)
                    .map(|i| start + (end - start) * i as f64 / (*points - 1).max(1) as f64)
                    .collect()
            }
            SweepSpec::List { values } => values.clone(),
        }
    }
}

/// Structure configuration: an ordered list of `[[structure.layer]]` tables.
#[derive(Debug, Deserialize)]
pub struct StructureConfig {
    pub layer: Vec<LayerConfig>,
}

/// A single layer in the stack.
#[derive(Debug, Deserialize)]
pub struct LayerConfig {
    pub name: String,
    /// Thickness in metres. Omit for the semi-infinite boundary layers.
    pub thickness: Option<f64>,
    #[serde(flatten)]
    pub material: MaterialConfig,
}

/// Material model, selected by which keys the layer table carries.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MaterialConfig {
    /// Single-resonance Lorentz oscillator.
    Lorentz {
        /// Oscillator density N (m⁻³).
        density: f64,
        /// Resonance angular frequency ω₀ (rad/s).
        resonance: f64,
        /// Damping rate γ (rad/s).
        linewidth: f64,
        /// Background susceptibility χ.
        #[serde(default)]
        susceptibility: f64,
        /// Use the near-resonance Lorentzian approximation.
        #[serde(default)]
        approximate: bool,
    },
    /// Dispersionless medium with index n + ik.
    Constant {
        n: f64,
        #[serde(default)]
        k: f64,
    },
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: JobConfig = toml::from_str(&content)?;
    Ok(config)
}
