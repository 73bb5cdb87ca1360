use fmu::fmi2::{instance::ModelExchange, Fmi2Error};

mod euler;

pub use euler::Euler;

/// The continuous-time part of a model, as seen by a solver.
pub trait Model {
    fn get_continuous_states(&mut self, x: &mut [f64]) -> Result<(), Fmi2Error>;
    fn set_continuous_states(&mut self, states: &[f64]) -> Result<(), Fmi2Error>;
    fn get_derivatives(&mut self, dx: &mut [f64]) -> Result<(), Fmi2Error>;
    fn get_event_indicators(&mut self, z: &mut [f64]) -> Result<(), Fmi2Error>;
}

impl<Inst: ModelExchange> Model for Inst {
    fn get_continuous_states(&mut self, x: &mut [f64]) -> Result<(), Fmi2Error> {
        ModelExchange::get_continuous_states(self, x).map(|_| ())
    }

    fn set_continuous_states(&mut self, states: &[f64]) -> Result<(), Fmi2Error> {
        ModelExchange::set_continuous_states(self, states).map(|_| ())
    }

    fn get_derivatives(&mut self, dx: &mut [f64]) -> Result<(), Fmi2Error> {
        ModelExchange::get_derivatives(self, dx).map(|_| ())
    }

    fn get_event_indicators(&mut self, z: &mut [f64]) -> Result<(), Fmi2Error> {
        ModelExchange::get_event_indicators(self, z).map(|_| ())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Cannot step backwards from t = {from} to t = {to}")]
    StepBackwards { from: f64, to: f64 },

    #[error(transparent)]
    Model(#[from] Fmi2Error),
}

pub trait Solver<M> {
    /// Create a new Solver instance.
    /// # Arguments
    /// * `nx` - The number of continuous states.
    /// * `nz` - The number of event indicators.
    fn new(start_time: f64, tolerance: f64, nx: usize, nz: usize) -> Self;

    /// Perform a single step of the solver.
    ///
    /// # Arguments
    /// * `model` - The model to be simulated.
    /// * `next_time` - The time at which the step should end.
    ///
    /// # Returns
    /// A tuple of (`time_reached`, `state_event`)
    fn step(&mut self, model: &mut M, next_time: f64) -> Result<(f64, bool), SolverError>;

    /// Reset the solver after an event at `time`.
    fn reset(&mut self, model: &mut M, time: f64) -> Result<(), SolverError>;
}
