//! Plotting of simulation results: one stacked subplot per recorded variable.

use arrow::{
    array::{Array, AsArray},
    compute::cast,
    datatypes::{DataType, Float64Type},
    record_batch::RecordBatch,
};

use crate::Error;

/// A named line of `[time, value]` points
pub type Series = (String, Vec<[f64; 2]>);

/// Extract one [`Series`] per non-time column of `batch`.
///
/// Integer columns are widened, booleans plot as 0/1 and string columns are skipped. Rows with a
/// null value are left out of their series.
pub fn series(batch: &RecordBatch) -> Result<Vec<Series>, Error> {
    let time = batch
        .column_by_name("time")
        .ok_or_else(|| Error::Plot("the result has no time column".to_owned()))?;
    let time = cast(time, &DataType::Float64)?;
    let time = time.as_primitive::<Float64Type>();

    let schema = batch.schema();
    let mut series = Vec::new();

    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        if field.name() == "time" || matches!(field.data_type(), DataType::Utf8) {
            continue;
        }

        let values = cast(column, &DataType::Float64)?;
        let values = values.as_primitive::<Float64Type>();

        let points = (0..batch.num_rows())
            .filter(|&row| time.is_valid(row) && values.is_valid(row))
            .map(|row| [time.value(row), values.value(row)])
            .collect();

        series.push((field.name().clone(), points));
    }

    Ok(series)
}

/// Show `batch` in a native plot window, blocking until the window is closed.
#[cfg(feature = "plot")]
pub fn plot_result(batch: &RecordBatch, title: &str) -> Result<(), Error> {
    let app = ResultPlot {
        series: series(batch)?,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_title(title),
        ..Default::default()
    };

    eframe::run_native(title, options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|err| Error::Plot(err.to_string()))
}

#[cfg(not(feature = "plot"))]
pub fn plot_result(_batch: &RecordBatch, _title: &str) -> Result<(), Error> {
    Err(Error::Plot(
        "fmu-launch was built without the `plot` feature".to_owned(),
    ))
}

#[cfg(feature = "plot")]
struct ResultPlot {
    series: Vec<Series>,
}

#[cfg(feature = "plot")]
impl eframe::App for ResultPlot {
    fn update(&mut self, ctx: &eframe::egui::Context, _frame: &mut eframe::Frame) {
        use egui_plot::{Legend, Line, Plot, PlotPoints};

        eframe::egui::CentralPanel::default().show(ctx, |ui| {
            if self.series.is_empty() {
                ui.label("No variables were recorded.");
                return;
            }

            let height = ui.available_height() / self.series.len() as f32;

            for (index, (name, points)) in self.series.iter().enumerate() {
                let plot_points: PlotPoints = points.clone().into();
                let is_last = index + 1 == self.series.len();

                let plot = Plot::new(name.as_str())
                    .legend(Legend::default())
                    .height(height)
                    .y_axis_label(name.as_str());
                let plot = if is_last {
                    plot.x_axis_label("time")
                } else {
                    plot
                };

                plot.show(ui, |plot_ui| {
                    plot_ui.line(Line::new(plot_points).name(name.as_str()));
                });
            }
        });
    }
}
