//! Recording outputs into Arrow arrays.

use std::sync::Arc;

use arrow::{
    array::{ArrayBuilder, ArrayRef, BooleanBuilder, Float64Builder, Int32Builder, StringBuilder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use fmu::fmi2::{binding, instance::Common, schema::Fmi2ModelDescription};

use super::params::SimParams;
use crate::Error;

/// Largest number of rows preallocated per column, builders grow past it on demand.
const MAX_PREALLOCATED_ROWS: usize = 4096;

enum ColumnBuilder {
    Real(Float64Builder),
    Integer(Int32Builder),
    Boolean(BooleanBuilder),
    String(StringBuilder),
}

impl ColumnBuilder {
    fn new(data_type: &DataType, capacity: usize) -> Self {
        match data_type {
            DataType::Int32 => Self::Integer(Int32Builder::with_capacity(capacity)),
            DataType::Boolean => Self::Boolean(BooleanBuilder::with_capacity(capacity)),
            DataType::Utf8 => Self::String(StringBuilder::new()),
            _ => Self::Real(Float64Builder::with_capacity(capacity)),
        }
    }

    fn finish(&mut self) -> ArrayRef {
        match self {
            Self::Real(b) => Arc::new(b.finish()),
            Self::Integer(b) => Arc::new(b.finish()),
            Self::Boolean(b) => Arc::new(b.finish()),
            Self::String(b) => Arc::new(b.finish()),
        }
    }
}

struct Recorder {
    field: Field,
    value_reference: binding::fmi2ValueReference,
    builder: ColumnBuilder,
}

/// Collects the time and the selected variables at every recorded point.
pub struct RecorderState {
    time: Float64Builder,
    recorders: Vec<Recorder>,
}

impl RecorderState {
    /// Record the variables named in `outputs`, in that order, or all outputs of the model if
    /// `outputs` is empty.
    pub fn new(
        md: &Fmi2ModelDescription,
        outputs: &[String],
        sim_params: &SimParams,
    ) -> Result<Self, Error> {
        let variables = if outputs.is_empty() {
            md.outputs().collect()
        } else {
            outputs
                .iter()
                .map(|name| md.model_variable_by_name(name))
                .collect::<Result<Vec<_>, _>>()?
        };

        let num_points = sim_params.num_points().min(MAX_PREALLOCATED_ROWS);
        let recorders = variables
            .into_iter()
            .map(|var| {
                let field = Field::new(&var.name, var.elem.data_type(), false);
                let builder = ColumnBuilder::new(field.data_type(), num_points);
                Recorder {
                    field,
                    value_reference: var.value_reference,
                    builder,
                }
            })
            .collect();

        Ok(Self {
            time: Float64Builder::with_capacity(num_points),
            recorders,
        })
    }

    /// Read every recorded variable from `inst` and append it with `time`.
    pub fn record<Inst: Common>(&mut self, inst: &mut Inst, time: f64) -> Result<(), Error> {
        log::trace!("Recording variables at time {time}");

        for Recorder {
            value_reference: vr,
            builder,
            ..
        } in &mut self.recorders
        {
            match builder {
                ColumnBuilder::Real(b) => {
                    let mut value = [0.0];
                    inst.get_real(&[*vr], &mut value)?;
                    b.append_value(value[0]);
                }
                ColumnBuilder::Integer(b) => {
                    let mut value = [0];
                    inst.get_integer(&[*vr], &mut value)?;
                    b.append_value(value[0]);
                }
                ColumnBuilder::Boolean(b) => {
                    let mut value = [binding::fmi2False];
                    inst.get_boolean(&[*vr], &mut value)?;
                    b.append_value(value[0] != binding::fmi2False);
                }
                ColumnBuilder::String(b) => {
                    let mut value = [String::new()];
                    inst.get_string(&[*vr], &mut value)?;
                    b.append_value(&value[0]);
                }
            }
        }
        self.time.append_value(time);

        Ok(())
    }

    /// Number of recorded points so far
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finish recording and return the RecordBatch, `time` first.
    pub fn finish(self) -> Result<RecordBatch, Error> {
        let Self {
            mut time,
            recorders,
        } = self;

        let time = std::iter::once((
            Field::new("time", DataType::Float64, false),
            Arc::new(time.finish()) as ArrayRef,
        ));
        let recorders = recorders.into_iter().map(
            |Recorder {
                 field, mut builder, ..
             }| (field, builder.finish()),
        );

        let (fields, columns): (Vec<_>, Vec<_>) = time.chain(recorders).unzip();
        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
    }
}
