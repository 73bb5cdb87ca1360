use fmu::fmi2::schema::Fmi2ModelDescription;

use super::SimOptions;
use crate::Error;

/// Number of output intervals when neither the options nor the model give one.
const DEFAULT_OUTPUT_POINTS: f64 = 500.0;
/// Upper bound on the number of output intervals of one run.
pub const MAX_OUTPUT_POINTS: usize = 100_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct SimParams {
    pub start_time: f64,
    pub stop_time: f64,
    pub output_interval: f64,
    pub tolerance: Option<f64>,
}

impl SimParams {
    /// Options take precedence over the model's `DefaultExperiment`.
    pub fn new(md: &Fmi2ModelDescription, options: &SimOptions) -> Result<Self, Error> {
        let de = md.default_experiment.as_ref();

        let start_time = options
            .start_time
            .or(de.and_then(|de| de.start_time))
            .unwrap_or(0.0);

        let stop_time = options
            .stop_time
            .or(de.and_then(|de| de.stop_time))
            .unwrap_or(1.0);

        if !stop_time.is_finite() || stop_time <= start_time {
            return Err(Error::InvalidParams(format!(
                "stop time {stop_time} must be after the start time {start_time}"
            )));
        }

        let output_interval = options
            .output_interval
            .or(de.and_then(|de| de.step_size))
            .unwrap_or((stop_time - start_time) / DEFAULT_OUTPUT_POINTS);

        if !output_interval.is_finite() || output_interval <= 0.0 {
            return Err(Error::InvalidParams(format!(
                "output interval must be positive, got {output_interval}"
            )));
        }

        let intervals = ((stop_time - start_time) / output_interval).ceil();
        if intervals > MAX_OUTPUT_POINTS as f64 {
            return Err(Error::InvalidParams(format!(
                "output interval {output_interval} gives {intervals:e} output points, at most {MAX_OUTPUT_POINTS} are supported"
            )));
        }

        let tolerance = options.tolerance.or(de.and_then(|de| de.tolerance));

        Ok(Self {
            start_time,
            stop_time,
            output_interval,
            tolerance,
        })
    }

    /// Tolerance used to snap times onto output points and the stop time.
    pub fn time_epsilon(&self) -> f64 {
        self.output_interval * 1e-9
    }

    /// The `n`-th output point after the start, clipped to the stop time.
    pub fn output_point(&self, n: usize) -> f64 {
        let t = self.start_time + n as f64 * self.output_interval;
        if t > self.stop_time - self.time_epsilon() {
            self.stop_time
        } else {
            t
        }
    }

    /// Whether `time` has reached the stop time.
    pub fn finished(&self, time: f64) -> bool {
        time >= self.stop_time - self.time_epsilon()
    }

    /// Expected number of recorded points, saturating at `usize::MAX`
    pub fn num_points(&self) -> usize {
        // float to int casts saturate, NaN becomes 0
        let intervals = ((self.stop_time - self.start_time) / self.output_interval).ceil() as usize;
        intervals.saturating_add(1)
    }
}
