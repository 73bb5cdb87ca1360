#![doc = include_str!("../README.md")]
#![doc = document_features::document_features!()]
#![deny(clippy::all)]

use std::{ffi::OsString, path::PathBuf};

use arrow::record_batch::RecordBatch;
use clap::Parser;
use fmu::{
    compile::{compile_platform_binary, CompileOptions},
    fmi2::import::Fmi2Import,
    traits::FmiImport as _,
};

pub mod config;
pub mod options;
pub mod output;
pub mod plot;
pub mod sim;

pub use config::LaunchConfig;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fmu(#[from] fmu::Error),

    #[error(transparent)]
    Schema(#[from] fmu::schema::Error),

    #[error("FMU call failed: {0}")]
    Fmi2(#[from] fmu::fmi2::Fmi2Error),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid launch configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid start value for {name}: {reason}")]
    InvalidStartValue { name: String, reason: String },

    #[error("Variable {name} is not Real, a unit ({unit}) cannot be given")]
    UnitOnNonReal { name: String, unit: String },

    #[error("Invalid simulation parameters: {0}")]
    InvalidParams(String),

    #[error("The FMU supports neither Co-Simulation nor Model Exchange")]
    NoInterface,

    #[error(transparent)]
    Solver(#[from] sim::solver::SolverError),

    #[error("Plotting failed: {0}")]
    Plot(String),

    #[error("Co-Simulation step from t = {0} is pending, asynchronous steps are not supported")]
    StepPending(f64),
}

/// Compile, simulate and plot as described by `config`.
///
/// Returns the simulation result. The plot window blocks until it is closed.
pub fn launch(config: &LaunchConfig) -> Result<RecordBatch, Error> {
    if config.compile {
        log::info!("compiling");
        let options = CompileOptions {
            include_dirs: config.include_dirs.clone(),
            ..Default::default()
        };
        compile_platform_binary(&config.model, &options)?;
    }

    log::info!("Simulating");
    let import = Fmi2Import::from_path(&config.model)?;
    let (batch, stats) = sim::simulate(&import, &config.sim_options())?;
    log::debug!("{stats:?}");

    if let Some(path) = &config.output_file {
        output::write_csv(&batch, path)?;
        log::info!("Wrote {} rows to {path:?}", batch.num_rows());
    }

    if config.plot {
        log::info!("plotting");
        plot::plot_result(&batch, &import.model_description().model_name)?;
    } else if config.output_file.is_none() {
        println!("{}", output::pretty(&batch)?);
    }

    Ok(batch)
}

/// Compile the platform binary of `model`, returning the path of the written FMU.
pub fn compile(
    model: PathBuf,
    output: Option<PathBuf>,
    include_dirs: Vec<PathBuf>,
    opt_level: u32,
) -> Result<PathBuf, Error> {
    log::info!("compiling");
    let options = CompileOptions {
        output,
        include_dirs,
        opt_level,
    };
    Ok(compile_platform_binary(model, &options)?)
}

pub fn entrypoint() -> anyhow::Result<()> {
    entrypoint_from(std::env::args_os())
}

pub fn entrypoint_from<I, T>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = options::Cli::parse_from(args);

    let _logger = flexi_logger::Logger::try_with_env_or_str(
        cli.verbose.log_level_filter().to_string(),
    )?
    .set_palette("b1;3;2;4;6".to_string())
    .start()?;

    match cli.command.unwrap_or(options::Command::Run(cli.run)) {
        options::Command::Run(args) => {
            let config = args.into_config()?;
            launch(&config)?;
        }
        options::Command::Compile {
            model,
            output,
            include_dirs,
            opt_level,
        } => {
            let written = compile(model, output, include_dirs, opt_level)?;
            println!("{}", written.display());
        }
        options::Command::Info { model } => {
            let import = Fmi2Import::from_path(&model)?;
            println!("{}", output::info(import.model_description()));
        }
        options::Command::Package {
            library,
            output_dir,
        } => {
            let written = fmu_export::package::package_library(&library, &output_dir)?;
            println!("{}", written.display());
        }
    }

    Ok(())
}
