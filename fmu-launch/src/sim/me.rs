use fmu::{
    fmi2::{
        import::Fmi2Import,
        instance::{Common, InstanceME, ModelExchange},
    },
    traits::FmiImport as _,
    EventFlags,
};

use super::{
    solver::{Euler, Solver},
    RecorderState, SimParams, SimStats, StartValue,
};
use crate::Error;

/// Run the event iteration until the discrete states settle.
///
/// Returns `true` if the FMU requested termination.
fn event_iteration<Inst: ModelExchange>(
    inst: &mut Inst,
    flags: &mut EventFlags,
) -> Result<bool, Error> {
    flags.discrete_states_need_update = true;
    flags.terminate_simulation = false;

    while flags.discrete_states_need_update {
        inst.new_discrete_states(flags)?;

        if flags.terminate_simulation {
            log::info!("Termination requested by FMU during event iteration");
            return Ok(true);
        }
    }

    Ok(false)
}

/// Main loop of the Model Exchange simulation, integrated with forward Euler.
pub(super) fn model_exchange(
    import: &Fmi2Import,
    params: &SimParams,
    start_values: &[StartValue],
    mut recorder: RecorderState,
) -> Result<(RecorderState, SimStats), Error> {
    log::trace!("Instantiating ME Simulation: {params:#?}");
    let md = import.model_description();
    let mut inst = import.instantiate_me("inst1", false, super::fmu_logging_on())?;
    super::initialize(&mut inst, params, start_values)?;

    let mut stats = SimStats::default();
    let mut time = params.start_time;
    let eps = params.time_epsilon();

    let mut flags = EventFlags::default();
    if event_iteration(&mut inst, &mut flags)? {
        recorder.record(&mut inst, time)?;
        inst.terminate()?;
        stats.end_time = time;
        return Ok((recorder, stats));
    }

    inst.enter_continuous_time_mode()?;

    let mut solver = <Euler as Solver<InstanceME>>::new(
        params.start_time,
        params.tolerance.unwrap_or_default(),
        md.num_states(),
        md.num_event_indicators(),
    );
    solver.reset(&mut inst, time)?;

    let mut num_points = 0;
    recorder.record(&mut inst, time)?;

    while !params.finished(time) {
        let next_regular_point = params.output_point(num_points + 1);

        let next_event_time = flags.next_event_time.filter(|t| *t > time + eps);
        let time_event = next_event_time.is_some_and(|t| t <= next_regular_point + eps);

        let (next_communication_point, regular) = match next_event_time {
            Some(t) if t < next_regular_point - eps => (t, false),
            _ => (next_regular_point, true),
        };

        let (time_reached, state_event) = solver.step(&mut inst, next_communication_point)?;
        time = time_reached;
        stats.num_steps += 1;

        inst.set_time(time)?;

        let (step_event, terminate) = inst.completed_integrator_step(true)?;
        if terminate {
            log::info!("Termination requested by FMU at t = {time}");
            recorder.record(&mut inst, time)?;
            break;
        }

        if time_event || state_event || step_event {
            log::trace!(
                "Event encountered at t = {time}. [Time: {time_event}, State: {state_event}, Step: {step_event}]"
            );
            stats.num_events += 1;

            inst.enter_event_mode()?;
            if event_iteration(&mut inst, &mut flags)? {
                recorder.record(&mut inst, time)?;
                break;
            }
            inst.enter_continuous_time_mode()?;
            solver.reset(&mut inst, time)?;
        }

        if regular {
            num_points += 1;
            recorder.record(&mut inst, time)?;
        }
    }

    stats.end_time = time;
    inst.terminate()?;

    Ok((recorder, stats))
}
