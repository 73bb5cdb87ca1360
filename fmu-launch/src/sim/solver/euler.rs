use super::{Model, Solver, SolverError};

/// Explicit forward Euler with state event detection on sign changes of the event indicators.
pub struct Euler {
    /// Current time
    time: f64,
    /// Continuous states
    x: Vec<f64>,
    /// Derivatives of continuous states
    dx: Vec<f64>,
    /// Event indicators
    z: Vec<f64>,
    /// Event indicators at the end of the previous step
    prez: Vec<f64>,
}

impl<M: Model> Solver<M> for Euler {
    fn new(start_time: f64, _tol: f64, nx: usize, nz: usize) -> Self {
        Self {
            time: start_time,
            x: vec![0.0; nx],
            dx: vec![0.0; nx],
            z: vec![0.0; nz],
            prez: vec![0.0; nz],
        }
    }

    fn step(&mut self, model: &mut M, next_time: f64) -> Result<(f64, bool), SolverError> {
        let dt = next_time - self.time;
        if dt < 0.0 {
            return Err(SolverError::StepBackwards {
                from: self.time,
                to: next_time,
            });
        }

        if !self.x.is_empty() {
            model.get_continuous_states(&mut self.x)?;
            model.get_derivatives(&mut self.dx)?;

            for (x, dx) in self.x.iter_mut().zip(&self.dx) {
                *x += dx * dt;
            }

            model.set_continuous_states(&self.x)?;
        }

        let mut state_event = false;

        if !self.z.is_empty() {
            model.get_event_indicators(&mut self.z)?;

            for (z, prez) in self.z.iter().zip(self.prez.iter_mut()) {
                // -\+ or +/-
                if (*prez <= 0.0 && *z > 0.0) || (*prez > 0.0 && *z <= 0.0) {
                    state_event = true;
                }
                *prez = *z;
            }
        }
        self.time = next_time;

        Ok((self.time, state_event))
    }

    fn reset(&mut self, model: &mut M, time: f64) -> Result<(), SolverError> {
        self.time = time;
        if !self.prez.is_empty() {
            model.get_event_indicators(&mut self.prez)?;
        }
        Ok(())
    }
}
