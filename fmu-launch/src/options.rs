//! Command line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};

use crate::{
    config::{LaunchConfig, StartValueArg},
    sim::Interface,
    Error,
};

/// Compile, simulate and plot an FMI 2.0 FMU
#[derive(Debug, Parser)]
#[command(version, about, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Arguments of `run`, which is the default command
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile the platform binary, simulate and plot (default)
    Run(RunArgs),

    /// Compile the platform binary of a source FMU
    Compile {
        /// The source FMU
        model: PathBuf,
        /// Write the compiled FMU here instead of modifying MODEL in place
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Additional include directory, e.g. for the FMI 2.0 headers
        #[arg(short = 'I', long = "include")]
        include_dirs: Vec<PathBuf>,
        /// Compiler optimization level
        #[arg(long, default_value_t = 2)]
        opt_level: u32,
    },

    /// Print the model description and variables of an FMU
    Info {
        /// The FMU to inspect
        model: PathBuf,
    },

    /// Package a shared library built with `fmu_export::export_fmu!` into an FMU
    Package {
        /// The compiled model library
        library: PathBuf,
        /// Directory to write `<modelIdentifier>.fmu` into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[derive(Debug, Default, Clone, Args)]
pub struct RunArgs {
    /// The FMU to simulate [default: data/Rectifier.fmu]
    pub model: Option<PathBuf>,

    /// Read the launch configuration from a TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Simulation start time [default: from the model, else 0]
    #[arg(long)]
    pub start_time: Option<f64>,

    /// Simulation stop time [default: 0.1]
    #[arg(long)]
    pub stop_time: Option<f64>,

    /// Interval at which outputs are recorded
    #[arg(long)]
    pub output_interval: Option<f64>,

    /// Relative tolerance passed to the FMU
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// FMI interface to use [default: cs if supported, else me]
    #[arg(long, value_enum)]
    pub interface: Option<Interface>,

    /// Start value as `name=value` or `name=value[unit]`, may be repeated
    #[arg(short = 's', long = "start-value", value_name = "NAME=VALUE")]
    pub start_values: Vec<StartValueArg>,

    /// Variable to record, may be repeated [default: outputs]
    #[arg(short = 'o', long = "output", value_name = "VARIABLE")]
    pub outputs: Vec<String>,

    /// Write the result as CSV
    #[arg(long)]
    pub output_file: Option<PathBuf>,

    /// Simulate the FMU as is, without compiling its sources first
    #[arg(long)]
    pub no_compile: bool,

    /// Additional include directory for compiling, may be repeated
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    pub include_dirs: Vec<PathBuf>,

    /// Don't open a plot window, print the result instead
    #[arg(long)]
    pub no_plot: bool,
}

impl RunArgs {
    /// The launch configuration: the `--config` file (or the default), overridden by the flags.
    pub fn into_config(self) -> Result<LaunchConfig, Error> {
        let mut config = match &self.config {
            Some(path) => LaunchConfig::from_file(path)?,
            None => LaunchConfig::default(),
        };

        if let Some(model) = self.model {
            config.model = model;
        }
        config.start_time = self.start_time.or(config.start_time);
        config.stop_time = self.stop_time.or(config.stop_time);
        config.output_interval = self.output_interval.or(config.output_interval);
        config.tolerance = self.tolerance.or(config.tolerance);
        config.interface = self.interface.or(config.interface);
        config
            .start_values
            .extend(self.start_values.into_iter().map(|arg| (arg.name, arg.value)));
        if !self.outputs.is_empty() {
            config.outputs = self.outputs;
        }
        config.output_file = self.output_file.or(config.output_file);
        config.compile &= !self.no_compile;
        config.include_dirs.extend(self.include_dirs);
        config.plot &= !self.no_plot;

        Ok(config)
    }
}
