//! The simulation master: Co-Simulation stepping and Model Exchange with a fixed-step solver.

mod cs;
pub mod io;
mod me;
pub mod params;
pub mod solver;
pub mod start_values;

use std::collections::BTreeMap;

use arrow::record_batch::RecordBatch;
use fmu::{
    fmi2::{import::Fmi2Import, instance::Common, schema::Fmi2ModelDescription},
    traits::FmiImport as _,
    InterfaceType,
};
use serde::{Deserialize, Serialize};

use crate::{config::StartValueSpec, Error};

pub use io::RecorderState;
pub use params::SimParams;
pub use start_values::StartValue;

/// The FMI interface a simulation runs through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Interface {
    #[serde(rename = "cs")]
    #[value(name = "cs")]
    CoSimulation,
    #[serde(rename = "me")]
    #[value(name = "me")]
    ModelExchange,
}

impl From<Interface> for InterfaceType {
    fn from(interface: Interface) -> Self {
        match interface {
            Interface::CoSimulation => InterfaceType::CoSimulation,
            Interface::ModelExchange => InterfaceType::ModelExchange,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SimOptions {
    /// Start time [default: from the model, else 0]
    pub start_time: Option<f64>,
    /// Stop time [default: from the model, else 1]
    pub stop_time: Option<f64>,
    /// Interval at which outputs are recorded [default: from the model, else (stop - start) / 500]
    pub output_interval: Option<f64>,
    /// Relative tolerance [default: from the model]
    pub tolerance: Option<f64>,
    /// [default: Co-Simulation if the FMU supports it, else Model Exchange]
    pub interface: Option<Interface>,
    pub start_values: BTreeMap<String, StartValueSpec>,
    /// Variables to record, all outputs when empty
    pub outputs: Vec<String>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct SimStats {
    /// End time of the simulation
    pub end_time: f64,
    /// Number of steps taken
    pub num_steps: usize,
    /// Number of events handled
    pub num_events: usize,
}

/// The interface to simulate with: the requested one if the FMU provides it, otherwise
/// Co-Simulation before Model Exchange.
pub fn select_interface(
    md: &Fmi2ModelDescription,
    requested: Option<Interface>,
) -> Result<Interface, Error> {
    let supports = |interface: Interface| match interface {
        Interface::CoSimulation => md.co_simulation.is_some(),
        Interface::ModelExchange => md.model_exchange.is_some(),
    };

    match requested {
        Some(interface) if supports(interface) => Ok(interface),
        Some(interface) => Err(fmu::Error::UnsupportedFmuType(interface.into()).into()),
        None => [Interface::CoSimulation, Interface::ModelExchange]
            .into_iter()
            .find(|interface| supports(*interface))
            .ok_or(Error::NoInterface),
    }
}

/// Simulate `import` from the start to the stop time.
///
/// Returns the recorded outputs with a leading `time` column, and some statistics of the run.
pub fn simulate(
    import: &Fmi2Import,
    options: &SimOptions,
) -> Result<(RecordBatch, SimStats), Error> {
    let md = import.model_description();
    let interface = select_interface(md, options.interface)?;
    let params = SimParams::new(md, options)?;
    let start_values = start_values::resolve_all(md, &options.start_values)?;
    let recorder = RecorderState::new(md, &options.outputs, &params)?;

    log::debug!("Simulating {} via {interface:?}: {params:?}", md.model_name);

    let (recorder, stats) = match interface {
        Interface::CoSimulation => cs::co_simulation(import, &params, &start_values, recorder)?,
        Interface::ModelExchange => me::model_exchange(import, &params, &start_values, recorder)?,
    };

    log::info!(
        "Simulation finished at t = {:.4} after {} steps and {} events.",
        stats.end_time,
        stats.num_steps,
        stats.num_events
    );

    Ok((recorder.finish()?, stats))
}

/// Apply the start values and run through initialization mode.
fn initialize<Inst: Common>(
    inst: &mut Inst,
    params: &SimParams,
    start_values: &[StartValue],
) -> Result<(), Error> {
    start_values::apply(inst, start_values)?;
    inst.setup_experiment(params.tolerance, params.start_time, Some(params.stop_time))?;
    inst.enter_initialization_mode()?;
    inst.exit_initialization_mode()?;
    Ok(())
}

/// Whether FMU-internal debug logging is switched on.
fn fmu_logging_on() -> bool {
    log::log_enabled!(log::Level::Debug)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn md(interfaces: &str) -> Fmi2ModelDescription {
        Fmi2ModelDescription::from_str(&format!(
            r#"<fmiModelDescription fmiVersion="2.0" modelName="M" guid="{{0}}">
                {interfaces}
                <ModelVariables/>
                <ModelStructure/>
            </fmiModelDescription>"#
        ))
        .unwrap()
    }

    #[test]
    fn test_select_interface() {
        let both = md(r#"<ModelExchange modelIdentifier="m"/><CoSimulation modelIdentifier="m"/>"#);
        assert_eq!(
            select_interface(&both, None).unwrap(),
            Interface::CoSimulation
        );
        assert_eq!(
            select_interface(&both, Some(Interface::ModelExchange)).unwrap(),
            Interface::ModelExchange
        );

        let me_only = md(r#"<ModelExchange modelIdentifier="m"/>"#);
        assert_eq!(
            select_interface(&me_only, None).unwrap(),
            Interface::ModelExchange
        );
        assert!(matches!(
            select_interface(&me_only, Some(Interface::CoSimulation)),
            Err(Error::Fmu(fmu::Error::UnsupportedFmuType(
                InterfaceType::CoSimulation
            )))
        ));

        assert!(matches!(
            select_interface(&md(""), None),
            Err(Error::NoInterface)
        ));
    }
}
