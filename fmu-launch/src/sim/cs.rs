use fmu::fmi2::{
    import::Fmi2Import,
    instance::{CoSimulation, Common},
    Fmi2Error, Fmi2Res,
};

use super::{RecorderState, SimParams, SimStats, StartValue};
use crate::Error;

/// What became of a single `do_step` call
#[derive(Debug, PartialEq)]
enum StepOutcome {
    Completed,
    /// The FMU discarded the step, possibly because it terminated
    Discarded,
    /// The FMU started an asynchronous step
    Pending,
}

fn step_outcome(time: f64, res: Result<Fmi2Res, Fmi2Error>) -> Result<StepOutcome, Error> {
    match res {
        Ok(Fmi2Res::OK | Fmi2Res::Warning) => Ok(StepOutcome::Completed),
        Ok(Fmi2Res::Pending) => Ok(StepOutcome::Pending),
        Err(Fmi2Error::Discard) => Ok(StepOutcome::Discarded),
        Err(err) => {
            log::error!("Co-Simulation step from t = {time} failed: {err}");
            Err(err.into())
        }
    }
}

/// Main loop of the co-simulation: record, then step to the next output point.
pub(super) fn co_simulation(
    import: &Fmi2Import,
    params: &SimParams,
    start_values: &[StartValue],
    mut recorder: RecorderState,
) -> Result<(RecorderState, SimStats), Error> {
    log::trace!("Instantiating CS Simulation: {params:#?}");
    let mut inst = import.instantiate_cs("inst1", false, super::fmu_logging_on())?;
    super::initialize(&mut inst, params, start_values)?;

    let mut stats = SimStats::default();
    let mut time = params.start_time;

    loop {
        recorder.record(&mut inst, time)?;

        if params.finished(time) {
            stats.end_time = time;
            break;
        }

        let next = params.output_point(stats.num_steps + 1);

        match step_outcome(time, inst.do_step(time, next - time, true))? {
            StepOutcome::Completed => {
                stats.num_steps += 1;
                time = next;
            }
            StepOutcome::Discarded => {
                if inst.terminated()? {
                    let time = inst.last_successful_time()?;
                    log::info!("Termination requested by FMU at t = {time}");
                    recorder.record(&mut inst, time)?;
                    stats.end_time = time;
                    break;
                }
                return Err(Fmi2Error::Discard.into());
            }
            StepOutcome::Pending => {
                // Asynchronous stepping is never requested, so the FMU is out of protocol here
                if let Ok(status) = inst.pending_status() {
                    log::warn!("Step from t = {time} pending: {status}");
                }
                if let Err(err) = inst.cancel_step() {
                    log::warn!("Cancelling the pending step failed: {err}");
                }
                return Err(Error::StepPending(time));
            }
        }
    }

    inst.terminate()?;

    Ok((recorder, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_outcome() {
        assert_eq!(
            step_outcome(0.0, Ok(Fmi2Res::OK)).unwrap(),
            StepOutcome::Completed
        );
        assert_eq!(
            step_outcome(0.0, Ok(Fmi2Res::Warning)).unwrap(),
            StepOutcome::Completed
        );
        assert_eq!(
            step_outcome(0.0, Err(Fmi2Error::Discard)).unwrap(),
            StepOutcome::Discarded
        );
        assert!(matches!(
            step_outcome(0.0, Err(Fmi2Error::Fatal)),
            Err(Error::Fmi2(Fmi2Error::Fatal))
        ));
    }

    #[test]
    fn test_pending_is_not_a_completed_step() {
        assert_eq!(
            step_outcome(0.5, Ok(Fmi2Res::Pending)).unwrap(),
            StepOutcome::Pending
        );
    }
}
