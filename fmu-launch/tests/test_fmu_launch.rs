use std::collections::BTreeMap;

use arrow::{
    array::AsArray,
    datatypes::{Float64Type, Int32Type},
    record_batch::RecordBatch,
};
use float_cmp::assert_approx_eq;
use fmu::fmi2::import::Fmi2Import;
use fmu_launch::{
    config::StartValueSpec,
    sim::{simulate, Interface, SimOptions},
    Error, LaunchConfig,
};
use fmu_test_data::Rectifier;
use rstest::rstest;

fn options(interface: Interface) -> SimOptions {
    SimOptions {
        stop_time: Some(0.1),
        interface: Some(interface),
        start_values: BTreeMap::from([
            (
                "minsamplestep".to_owned(),
                StartValueSpec::WithUnit {
                    value: 25.0,
                    unit: "ms".to_owned(),
                },
            ),
            (
                "binfilename".to_owned(),
                StartValueSpec::String("DISABLED".to_owned()),
            ),
        ]),
        ..Default::default()
    }
}

fn column_f64(batch: &RecordBatch, name: &str) -> Vec<f64> {
    batch
        .column_by_name(name)
        .unwrap()
        .as_primitive::<Float64Type>()
        .values()
        .to_vec()
}

#[rstest]
#[case::co_simulation(Interface::CoSimulation)]
#[case::model_exchange(Interface::ModelExchange)]
#[test_log::test]
fn test_simulate_rectifier(#[case] interface: Interface) {
    let import = Rectifier::import().unwrap();
    let (batch, stats) = simulate(&import, &options(interface)).unwrap();

    let names: Vec<_> = batch
        .schema()
        .fields()
        .iter()
        .map(|field| field.name().clone())
        .collect();
    assert_eq!(names, ["time", "outputs", "samplestep", "nSamples"]);

    // (stop - start) / 500 intervals
    assert_eq!(batch.num_rows(), 501);
    let time = column_f64(&batch, "time");
    assert_eq!(time[0], 0.0);
    assert_approx_eq!(f64, time[1], 2e-4, epsilon = 1e-12);
    assert_eq!(*time.last().unwrap(), 0.1);
    assert!(time.windows(2).all(|w| w[1] > w[0]));
    assert_approx_eq!(f64, stats.end_time, 0.1);

    let outputs = column_f64(&batch, "outputs");
    assert_eq!(outputs[0], 0.0);
    assert!(outputs.iter().all(|v| (-1e-9..=10.0 + 1e-6).contains(v)));
    let last = *outputs.last().unwrap();
    assert!(last > 5.0 && last < 10.0, "outputs = {last}");

    assert!(column_f64(&batch, "samplestep")
        .iter()
        .all(|step| (step - 0.025).abs() < 1e-12));

    let samples = batch
        .column_by_name("nSamples")
        .unwrap()
        .as_primitive::<Int32Type>();
    assert_eq!(samples.value(0), 1);
    assert_eq!(samples.value(samples.len() - 1), 5);

    if interface == Interface::ModelExchange {
        assert!(stats.num_events >= 4, "{stats:?}");
    }
}

/// `tTerminate` between two output points, so the final row is not a regular one.
const T_TERMINATE: f64 = 0.0421;

#[rstest]
#[case::co_simulation(Interface::CoSimulation)]
#[case::model_exchange(Interface::ModelExchange)]
#[test_log::test]
fn test_simulate_terminated_by_fmu(#[case] interface: Interface) {
    let import = Rectifier::import().unwrap();
    let mut options = options(interface);
    options
        .start_values
        .insert("tTerminate".to_owned(), StartValueSpec::Float(T_TERMINATE));
    let (batch, stats) = simulate(&import, &options).unwrap();

    assert_approx_eq!(f64, stats.end_time, T_TERMINATE, epsilon = 1e-9);

    // 0, 2e-4, .., 0.042 and the termination point
    assert_eq!(batch.num_rows(), 212, "{stats:?}");
    let time = column_f64(&batch, "time");
    assert_approx_eq!(f64, *time.last().unwrap(), T_TERMINATE, epsilon = 1e-9);
    assert_approx_eq!(f64, time[time.len() - 2], 0.042, epsilon = 1e-9);
    assert!(time.windows(2).all(|w| w[1] > w[0]));

    // samples at 0 and 25 ms only
    let samples = batch
        .column_by_name("nSamples")
        .unwrap()
        .as_primitive::<Int32Type>();
    assert_eq!(samples.value(samples.len() - 1), 2);

    match interface {
        Interface::CoSimulation => assert_eq!(stats.num_steps, 210),
        Interface::ModelExchange => assert!(stats.num_events >= 2, "{stats:?}"),
    }
}

#[test_log::test]
fn test_simulate_selected_outputs() {
    let import = Rectifier::import().unwrap();
    let options = SimOptions {
        output_interval: Some(0.01),
        outputs: vec!["Vin".to_owned(), "conducting".to_owned()],
        ..options(Interface::CoSimulation)
    };
    let (batch, stats) = simulate(&import, &options).unwrap();

    assert_eq!(batch.num_columns(), 3);
    assert_eq!(batch.num_rows(), 11);
    assert_eq!(stats.num_steps, 10);

    let vin = column_f64(&batch, "Vin");
    // half a period of the 50 Hz source
    assert_approx_eq!(f64, vin[1], 0.0, epsilon = 1e-9);

    let conducting = batch.column_by_name("conducting").unwrap().as_boolean();
    assert_eq!(conducting.len(), 11);
}

#[test]
fn test_simulate_errors() {
    let import = Rectifier::import().unwrap();

    let unknown = SimOptions {
        outputs: vec!["nope".to_owned()],
        ..options(Interface::CoSimulation)
    };
    assert!(matches!(
        simulate(&import, &unknown),
        Err(Error::Schema(fmu::schema::Error::VariableNotFound(_)))
    ));

    let backwards = SimOptions {
        start_time: Some(1.0),
        stop_time: Some(0.5),
        ..options(Interface::CoSimulation)
    };
    assert!(matches!(
        simulate(&import, &backwards),
        Err(Error::InvalidParams(_))
    ));

    let mut zero_step = options(Interface::ModelExchange);
    zero_step
        .start_values
        .insert("minsamplestep".to_owned(), StartValueSpec::Float(0.0));
    assert!(matches!(
        simulate(&import, &zero_step),
        Err(Error::Fmi2(_))
    ));

    let tiny_interval = SimOptions {
        output_interval: Some(1e-300),
        ..options(Interface::CoSimulation)
    };
    assert!(matches!(
        simulate(&import, &tiny_interval),
        Err(Error::InvalidParams(_))
    ));
}

#[test_log::test]
fn test_launch_to_csv() {
    let source = Rectifier::source_fmu().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("result.csv");

    let config = LaunchConfig {
        model: source.to_path_buf(),
        output_interval: Some(0.01),
        output_file: Some(csv.clone()),
        plot: false,
        ..Default::default()
    };
    let batch = fmu_launch::launch(&config).unwrap();
    assert_eq!(batch.num_rows(), 11);
    assert_eq!(batch.schema().field(1).name(), "outputs");

    // The binary was compiled into the source FMU
    Fmi2Import::from_path(&source)
        .unwrap()
        .instantiate_cs("inst1", false, false)
        .unwrap();

    let text = std::fs::read_to_string(&csv).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("time,outputs"));
    assert_eq!(lines.count(), 11);
}
