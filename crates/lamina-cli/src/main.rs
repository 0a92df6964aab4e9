//! Lamina command-line interface.
//!
//! Inspect multilayer jobs defined in TOML configuration files:
//! ```sh
//! lamina-cli describe job.toml
//! lamina-cli validate job.toml
//! lamina-cli materials
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lamina-cli")]
#[command(about = "Lamina: 1D multilayer optics toolkit")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a job's stack and write its layer index spectra to CSV.
    Describe {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without producing output.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Display the available material models.
    Materials,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Describe { config, output } => {
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let frequencies = job.sweep.frequencies.values();
            runner::check_frequencies(&frequencies)?;
            let structure = runner::build_structure(&job)?;
            runner::print_structure(&job, &structure);
            println!(
                "Sweep: {} frequencies x {} angles",
                frequencies.len(),
                job.sweep.angles.values().len()
            );

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));
            let csv_path = out_dir.join("index_spectra.csv");
            runner::write_index_csv(&job, &structure, &frequencies, &csv_path)?;
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            runner::check_frequencies(&job.sweep.frequencies.values())?;
            let _structure = runner::build_structure(&job)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Materials => {
            println!("Material models (per [[structure.layer]] keys):");
            println!();
            println!("  Constant index:");
            println!("    n          — real part of the refractive index");
            println!("    k          — extinction coefficient (default 0)");
            println!();
            println!("  Lorentz oscillator:");
            println!("    density        — oscillator density N (m^-3)");
            println!("    resonance      — resonance angular frequency (rad/s)");
            println!("    linewidth      — damping rate (rad/s)");
            println!("    susceptibility — background susceptibility (default 0)");
            println!("    approximate    — near-resonance Lorentzian form (default false)");
            Ok(())
        }
    }
}
