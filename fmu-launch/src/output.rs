//! Writing simulation results and model information.

use std::{fs::File, path::Path};

use arrow::{csv::WriterBuilder, record_batch::RecordBatch, util::pretty::pretty_format_batches};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
use fmu::{fmi2::schema::Fmi2ModelDescription, schema::variable_counts::VariableCounts};
use itertools::Itertools;

use crate::Error;

/// Write `batch` as CSV with a header row.
pub fn write_csv(batch: &RecordBatch, path: impl AsRef<Path>) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(batch)?;
    Ok(())
}

/// Format `batch` as a table for the terminal.
pub fn pretty(batch: &RecordBatch) -> Result<String, Error> {
    Ok(pretty_format_batches(std::slice::from_ref(batch))?.to_string())
}

fn or_dash(value: Option<impl ToString>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

/// Summary of a model: general information, supported interfaces, the default experiment, the
/// variables and their counts.
pub fn info(md: &Fmi2ModelDescription) -> String {
    let mut general = Table::new();
    general.load_preset(UTF8_FULL_CONDENSED);
    general.add_row(vec!["Model name".to_owned(), md.model_name.clone()]);
    general.add_row(vec!["GUID".to_owned(), md.guid.clone()]);
    general.add_row(vec!["FMI version".to_owned(), md.fmi_version.clone()]);
    general.add_row(vec!["Version".to_owned(), or_dash(md.version.as_ref())]);
    general.add_row(vec![
        "Description".to_owned(),
        or_dash(md.description.as_ref()),
    ]);
    general.add_row(vec![
        "Generation tool".to_owned(),
        or_dash(md.generation_tool.as_ref()),
    ]);

    let interfaces = [
        md.model_exchange
            .as_ref()
            .map(|me| format!("Model Exchange ({})", me.model_identifier)),
        md.co_simulation
            .as_ref()
            .map(|cs| format!("Co-Simulation ({})", cs.model_identifier)),
    ];
    general.add_row(vec![
        "Interfaces".to_owned(),
        interfaces.into_iter().flatten().join("\n"),
    ]);

    let de = md.default_experiment.as_ref();
    general.add_row(vec![
        "Default experiment".to_owned(),
        format!(
            "start {}, stop {}, step {}, tolerance {}",
            or_dash(de.and_then(|de| de.start_time)),
            or_dash(de.and_then(|de| de.stop_time)),
            or_dash(de.and_then(|de| de.step_size)),
            or_dash(de.and_then(|de| de.tolerance)),
        ),
    ]);

    if let Some(log_categories) = &md.log_categories {
        let names = log_categories
            .categories
            .iter()
            .map(|cat| cat.name.as_str())
            .join(", ");
        general.add_row(vec!["Log categories".to_owned(), names]);
    }

    let mut variables = Table::new();
    variables.load_preset(UTF8_FULL_CONDENSED);
    variables.set_header(vec![
        "Name",
        "VR",
        "Type",
        "Causality",
        "Variability",
        "Unit",
        "Description",
    ]);
    for var in md.get_model_variables() {
        variables.add_row(vec![
            var.name.clone(),
            var.value_reference.to_string(),
            var.elem.type_name().to_owned(),
            var.causality.to_string(),
            var.variability.to_string(),
            or_dash(md.unit_of(var)),
            or_dash(var.description.as_ref()),
        ]);
    }

    let mut counts = Table::new();
    counts.load_preset(UTF8_FULL_CONDENSED);
    counts.set_header(vec!["Variables", "Count"]);
    for (label, count) in md.model_counts().rows() {
        if count > 0 {
            counts.add_row(vec![label.to_owned(), count.to_string()]);
        }
    }

    format!("{general}\n{variables}\n{counts}")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::{Float64Array, Int32Array},
        datatypes::{DataType, Field, Schema},
    };

    use super::*;

    fn batch() -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("time", DataType::Float64, false),
            Field::new("n", DataType::Int32, false),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Float64Array::from(vec![0.0, 0.5])),
                Arc::new(Int32Array::from(vec![1, 2])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&batch(), &path).unwrap();

        let csv = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "time,n");
        assert_eq!(lines.len(), 3);
        assert!(lines[2].ends_with(",2"));
    }

    #[test]
    fn test_pretty() {
        let table = pretty(&batch()).unwrap();
        assert!(table.contains("time"));
        assert!(table.contains("| n "));
    }

    #[test]
    fn test_info() {
        let import = fmu_test_data::Rectifier::import().unwrap();
        let md = fmu::traits::FmiImport::model_description(&import);
        let info = info(md);

        assert!(info.contains("Rectifier"));
        assert!(info.contains("Co-Simulation (rectifier)"));
        assert!(info.contains("minsamplestep"));
        assert!(info.contains("binfilename"));
    }
}
