//! Builds structures from configuration and writes index spectra.

use std::path::Path;

use anyhow::{Context, Result};
use num_complex::Complex64;

use lamina_core::material::{
    ConstantIndex, IndexComponent, LorentzOscillator, MaterialHandle,
};
use lamina_core::spectrum::convert_frequency_and_wavelength;
use lamina_core::structure::{Layer, Multilayer};

use crate::config::{JobConfig, LayerConfig, MaterialConfig};

/// Build a material handle from one layer's configuration.
fn build_material(layer: &LayerConfig) -> MaterialHandle {
    match &layer.material {
        MaterialConfig::Constant { n, k } => {
            MaterialHandle::erased(ConstantIndex::complex(&layer.name, Complex64::new(*n, *k)))
        }
        MaterialConfig::Lorentz {
            density,
            resonance,
            linewidth,
            susceptibility,
            approximate,
        } => {
            let mut medium = LorentzOscillator::new(
                &layer.name,
                *density,
                *resonance,
                *linewidth,
                *susceptibility,
            );
            medium.approximate = *approximate;
            MaterialHandle::erased(medium)
        }
    }
}

/// Build the multilayer stack from a parsed job configuration.
pub fn build_structure(job: &JobConfig) -> Result<Multilayer> {
    log::debug!("building a {}-layer stack", job.structure.layer.len());
    let mut layers = Vec::with_capacity(job.structure.layer.len());
    for cfg in &job.structure.layer {
        let material = build_material(cfg);
        let layer = match cfg.thickness {
            Some(thickness) => Layer::new(material, thickness)
                .with_context(|| format!("Layer '{}'", cfg.name))?,
            None => Layer::semi_infinite(material),
        };
        layers.push(layer);
    }
    Multilayer::new(layers).context("Building the multilayer stack")
}

/// Check the configured frequency sweep for values a solver would reject.
pub fn check_frequencies(frequencies: &[f64]) -> Result<()> {
    if frequencies.is_empty() {
        anyhow::bail!("Frequency sweep is empty");
    }
    for (i, &f) in frequencies.iter().enumerate() {
        if !f.is_finite() || f <= 0.0 {
            anyhow::bail!("Frequency sweep entry {} is {}, expected a positive finite value", i, f);
        }
    }
    Ok(())
}

/// Print a human-readable summary of the stack.
pub fn print_structure(job: &JobConfig, structure: &Multilayer) {
    println!("Stack ({} layers):", structure.len());
    for (cfg, layer) in job.structure.layer.iter().zip(structure.layers()) {
        let n = layer.representative_index();
        match cfg.thickness {
            Some(t) => println!(
                "  {:<12} thickness = {:.3e} m, n ≈ {:.4} + {:.4}i",
                cfg.name, t, n.re, n.im
            ),
            None => println!("  {:<12} semi-infinite, n ≈ {:.4} + {:.4}i", cfg.name, n.re, n.im),
        }
    }
}

/// Write per-layer index spectra to a CSV file with a metadata header.
pub fn write_index_csv(
    job: &JobConfig,
    structure: &Multilayer,
    frequencies: &[f64],
    path: &Path,
) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)?;

    writeln!(file, "# Lamina — layer index spectra")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    for cfg in &job.structure.layer {
        match cfg.thickness {
            Some(t) => writeln!(file, "# layer '{}': thickness={} m", cfg.name, t)?,
            None => writeln!(file, "# layer '{}': semi-infinite", cfg.name)?,
        }
    }
    writeln!(file, "#")?;

    write!(file, "frequency_hz,wavelength_m")?;
    for cfg in &job.structure.layer {
        write!(file, ",{}_n,{}_k", cfg.name, cfg.name)?;
    }
    writeln!(file)?;

    for &f in frequencies {
        write!(file, "{:.6e},{:.6e}", f, convert_frequency_and_wavelength(f))?;
        for layer in structure.layers() {
            let index = layer.index(f, IndexComponent::X);
            write!(file, ",{:.6e},{:.6e}", index.re, index.im)?;
        }
        writeln!(file)?;
    }

    println!("Index spectra written to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    fn job() -> JobConfig {
        toml::from_str(
            r#"
            [sweep]
            frequencies = { values = [4.0e14, 5.0e14] }

            [[structure.layer]]
            name = "vacuum"
            n = 1.0

            [[structure.layer]]
            name = "film"
            thickness = 5.0e-7
            n = 2.0
            k = 0.1

            [[structure.layer]]
            name = "substrate"
            n = 1.45
            "#,
        )
        .unwrap()
    }

    #[test]
    fn structure_builds_with_boundary_half_spaces() {
        let job = job();
        let structure = build_structure(&job).unwrap();
        assert_eq!(structure.len(), 3);
        assert_eq!(structure.thicknesses().to_vec(), vec![0.0, 5.0e-7, 0.0]);
        assert_eq!(
            structure.layers()[1].index(4.0e14, IndexComponent::X),
            Complex64::new(2.0, 0.1)
        );
    }

    #[test]
    fn negative_thickness_names_the_layer() {
        let mut job = job();
        job.structure.layer[1].thickness = Some(-1.0e-7);
        let err = build_structure(&job).unwrap_err();
        assert!(format!("{err:#}").contains("film"));
    }

    #[test]
    fn frequency_checks_reject_bad_sweeps() {
        assert!(check_frequencies(&[]).is_err());
        assert!(check_frequencies(&[4.0e14, 0.0]).is_err());
        assert!(check_frequencies(&[4.0e14, f64::NAN]).is_err());
        assert!(check_frequencies(&[4.0e14, 5.0e14]).is_ok());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/job.toml")).is_err());
    }
}
