//! Launch configuration, read from TOML and overridden on the command line.

use std::{collections::BTreeMap, path::Path, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    sim::{Interface, SimOptions},
    Error,
};

/// The value given for a start value, before it is checked against the model description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartValueSpec {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// A Real value given in one of the variable's display units
    WithUnit { value: f64, unit: String },
}

impl std::fmt::Display for StartValueSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartValueSpec::Boolean(b) => write!(f, "{b}"),
            StartValueSpec::Integer(i) => write!(f, "{i}"),
            StartValueSpec::Float(v) => write!(f, "{v}"),
            StartValueSpec::String(s) => write!(f, "'{s}'"),
            StartValueSpec::WithUnit { value, unit } => write!(f, "{value}[{unit}]"),
        }
    }
}

impl FromStr for StartValueSpec {
    type Err = String;

    /// Parse `value` or `value[unit]`. Quoted values are strings, `true`/`false` are booleans and
    /// anything else that is not a number is taken as a string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        for quote in ['\'', '"'] {
            if let Some(inner) = s
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
            {
                return Ok(StartValueSpec::String(inner.to_owned()));
            }
        }

        if let Some((value, unit)) = s.strip_suffix(']').and_then(|rest| rest.split_once('[')) {
            let value = value
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("`{value}` is not a number: {e}"))?;
            let unit = unit.trim();
            if unit.is_empty() {
                return Err(format!("Empty unit in `{s}`"));
            }
            return Ok(StartValueSpec::WithUnit {
                value,
                unit: unit.to_owned(),
            });
        }

        Ok(match s {
            "true" => StartValueSpec::Boolean(true),
            "false" => StartValueSpec::Boolean(false),
            _ => {
                if let Ok(i) = s.parse::<i64>() {
                    StartValueSpec::Integer(i)
                } else if let Ok(v) = s.parse::<f64>() {
                    StartValueSpec::Float(v)
                } else {
                    StartValueSpec::String(s.to_owned())
                }
            }
        })
    }
}

/// A `name=value[unit]` command line argument
#[derive(Debug, Clone, PartialEq)]
pub struct StartValueArg {
    pub name: String,
    pub value: StartValueSpec,
}

impl FromStr for StartValueArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| format!("Expected `name=value`, found `{s}`"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("Missing variable name in `{s}`"));
        }
        Ok(Self {
            name: name.to_owned(),
            value: value.parse()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchConfig {
    /// The FMU to compile and simulate
    pub model: PathBuf,
    pub start_time: Option<f64>,
    pub stop_time: Option<f64>,
    pub output_interval: Option<f64>,
    pub tolerance: Option<f64>,
    pub interface: Option<Interface>,
    pub start_values: BTreeMap<String, StartValueSpec>,
    /// Variables to record, all outputs when empty
    pub outputs: Vec<String>,
    /// Write the result as CSV
    pub output_file: Option<PathBuf>,
    /// Compile the platform binary before simulating
    pub compile: bool,
    /// Additional include directories for compiling, searched before the FMI 2.0 headers
    pub include_dirs: Vec<PathBuf>,
    /// Show the result in a plot window
    pub plot: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("data/Rectifier.fmu"),
            start_time: None,
            stop_time: Some(0.1),
            output_interval: None,
            tolerance: None,
            interface: None,
            start_values: BTreeMap::from([
                (
                    "minsamplestep".to_owned(),
                    StartValueSpec::WithUnit {
                        value: 0.025,
                        unit: "s".to_owned(),
                    },
                ),
                (
                    "binfilename".to_owned(),
                    StartValueSpec::String("DISABLED".to_owned()),
                ),
            ]),
            outputs: vec!["outputs".to_owned()],
            output_file: None,
            compile: true,
            include_dirs: Vec::new(),
            plot: true,
        }
    }
}

impl LaunchConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        log::debug!("Reading launch configuration {path:?}");
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// The simulation part of the configuration
    pub fn sim_options(&self) -> SimOptions {
        SimOptions {
            start_time: self.start_time,
            stop_time: self.stop_time,
            output_interval: self.output_interval,
            tolerance: self.tolerance,
            interface: self.interface,
            start_values: self.start_values.clone(),
            outputs: self.outputs.clone(),
        }
    }
}
