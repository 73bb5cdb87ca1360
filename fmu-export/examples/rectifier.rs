//! Half-wave rectifier with an RC load, exported as an FMI 2.0 Co-Simulation FMU.
//!
//! ```text
//! Vin(t)   = A sin(2 pi f t)
//! C dVc/dt = (conducting ? (Vin - Vc) / Ron : 0) - Vc / Rload
//! ```
//!
//! Build with `cargo build -p fmu-export --example rectifier` and package the resulting library
//! with `fmu-launch package`.

use std::f64::consts::PI;

use fmu_export::fmi2::{
    Causality, Model, ModelError, Start, StepResult, UserModel, Variability, Variable,
};

const FREQUENCY: f64 = 50.0;
const R_ON: f64 = 10.0;
const R_LOAD: f64 = 1000.0;
const CAPACITANCE: f64 = 1e-4;
const INTERNAL_STEP: f64 = 1e-5;
const EPSILON: f64 = 1e-9;

pub const VR_OUTPUTS: u32 = 0;
pub const VR_VIN: u32 = 1;
pub const VR_AMPLITUDE: u32 = 2;
pub const VR_TTERMINATE: u32 = 3;
pub const VR_NSTEPS: u32 = 0;
pub const VR_CONDUCTING: u32 = 0;

#[derive(Debug)]
pub struct Rectifier {
    amplitude: f64,
    t_terminate: f64,
    time: f64,
    vc: f64,
    conducting: bool,
    n_steps: i32,
}

impl Default for Rectifier {
    fn default() -> Self {
        Self {
            amplitude: 10.0,
            t_terminate: 0.0,
            time: 0.0,
            vc: 0.0,
            conducting: false,
            n_steps: 0,
        }
    }
}

impl Rectifier {
    fn vin(&self, time: f64) -> f64 {
        self.amplitude * (2.0 * PI * FREQUENCY * time).sin()
    }

    fn integrate(&mut self, until: f64) {
        while self.time < until - EPSILON {
            let h = INTERNAL_STEP.min(until - self.time);
            let vin = self.vin(self.time);
            self.conducting = vin > self.vc;
            let mut der = -self.vc / (R_LOAD * CAPACITANCE);
            if self.conducting {
                der += (vin - self.vc) / (R_ON * CAPACITANCE);
            }
            self.vc += h * der;
            self.time += h;
        }
        self.time = until;
    }
}

impl Model for Rectifier {
    const MODEL_NAME: &'static str = "Rectifier";
    const MODEL_IDENTIFIER: &'static str = "rust_rectifier";
    const GUID: &'static str = "{8c2b7e1d-5a43-4f0e-9d26-3b1f0a7c6e58}";
    const DESCRIPTION: &'static str = "Half-wave rectifier with an RC load";

    fn variables() -> Vec<Variable> {
        vec![
            Variable::real("outputs", VR_OUTPUTS)
                .causality(Causality::Output)
                .unit("V")
                .description("Capacitor voltage"),
            Variable::real("Vin", VR_VIN).unit("V"),
            Variable::real("amplitude", VR_AMPLITUDE)
                .causality(Causality::Parameter)
                .variability(Variability::Fixed)
                .unit("V")
                .start(Start::Real(Some(10.0))),
            Variable::real("tTerminate", VR_TTERMINATE)
                .causality(Causality::Parameter)
                .variability(Variability::Fixed)
                .unit("s")
                .description("Request termination at this time, if positive")
                .start(Start::Real(Some(0.0))),
            Variable::integer("nSteps", VR_NSTEPS).causality(Causality::Output),
            Variable::boolean("conducting", VR_CONDUCTING),
        ]
    }

    fn get_real(&self, vr: u32) -> Option<f64> {
        match vr {
            VR_OUTPUTS => Some(self.vc),
            VR_VIN => Some(self.vin(self.time)),
            VR_AMPLITUDE => Some(self.amplitude),
            VR_TTERMINATE => Some(self.t_terminate),
            _ => None,
        }
    }

    fn get_integer(&self, vr: u32) -> Option<i32> {
        (vr == VR_NSTEPS).then_some(self.n_steps)
    }

    fn get_boolean(&self, vr: u32) -> Option<bool> {
        (vr == VR_CONDUCTING).then_some(self.conducting)
    }

    fn set_real(&mut self, vr: u32, value: f64) -> Result<(), ModelError> {
        match vr {
            VR_AMPLITUDE if value.is_finite() => self.amplitude = value,
            VR_TTERMINATE if value >= 0.0 => self.t_terminate = value,
            VR_AMPLITUDE => return Err(ModelError::InvalidValue("amplitude")),
            VR_TTERMINATE => return Err(ModelError::InvalidValue("tTerminate")),
            _ => return Err(ModelError::UnknownValueReference(vr)),
        }
        Ok(())
    }
}

impl UserModel for Rectifier {
    fn initialize(&mut self, start_time: f64) -> Result<(), ModelError> {
        self.time = start_time;
        self.conducting = self.vin(start_time) > self.vc;
        Ok(())
    }

    fn do_step(&mut self, time: f64, step_size: f64) -> Result<StepResult, ModelError> {
        self.time = time;
        let end = time + step_size;
        let terminate = self.t_terminate > 0.0 && end > self.t_terminate + EPSILON;
        self.integrate(if terminate {
            self.t_terminate.max(time)
        } else {
            end
        });
        self.n_steps += 1;
        if terminate {
            Ok(StepResult::Terminated { time: self.time })
        } else {
            Ok(StepResult::Completed)
        }
    }
}

fmu_export::export_fmu!(Rectifier);
