use fmu::fmi2::schema::{Causality, Variability};

/// Errors a model reports back through the FMI API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Unknown value reference {0}")]
    UnknownValueReference(u32),

    #[error("Variable {name} (vr = {vr}) cannot be set {when}")]
    NotSettable {
        name: &'static str,
        vr: u32,
        when: &'static str,
    },

    #[error("Invalid value for {0}")]
    InvalidValue(&'static str),

    #[error("{0}")]
    Model(String),
}

/// Type and start value of an exported variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Start {
    Real(Option<f64>),
    Integer(Option<i32>),
    Boolean(Option<bool>),
}

impl Start {
    pub fn type_name(&self) -> &'static str {
        match self {
            Start::Real(_) => "Real",
            Start::Integer(_) => "Integer",
            Start::Boolean(_) => "Boolean",
        }
    }
}

/// Metadata of one exported variable, as written to `modelDescription.xml`.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: &'static str,
    pub value_reference: u32,
    pub description: Option<&'static str>,
    pub causality: Causality,
    pub variability: Variability,
    pub start: Start,
    pub unit: Option<&'static str>,
}

impl Variable {
    fn new(name: &'static str, value_reference: u32, start: Start) -> Self {
        Self {
            name,
            value_reference,
            description: None,
            causality: Causality::Local,
            variability: match start {
                Start::Real(_) => Variability::Continuous,
                _ => Variability::Discrete,
            },
            start,
            unit: None,
        }
    }

    pub fn real(name: &'static str, value_reference: u32) -> Self {
        Self::new(name, value_reference, Start::Real(None))
    }

    pub fn integer(name: &'static str, value_reference: u32) -> Self {
        Self::new(name, value_reference, Start::Integer(None))
    }

    pub fn boolean(name: &'static str, value_reference: u32) -> Self {
        Self::new(name, value_reference, Start::Boolean(None))
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn causality(mut self, causality: Causality) -> Self {
        self.causality = causality;
        self
    }

    pub fn variability(mut self, variability: Variability) -> Self {
        self.variability = variability;
        self
    }

    pub fn unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Set the start value; the variant must match the variable type.
    pub fn start(mut self, start: Start) -> Self {
        self.start = start;
        self
    }

    /// Parameters and inputs carry their start value in the model description.
    pub fn has_start(&self) -> bool {
        matches!(self.causality, Causality::Parameter | Causality::Input)
    }
}

/// Model metadata and variable access by value reference.
///
/// Getters return `None` for value references the model does not know of the requested type.
pub trait Model: Default {
    const MODEL_NAME: &'static str;
    /// Base name of the shared library inside the FMU.
    const MODEL_IDENTIFIER: &'static str;
    /// Must be unique for every change of the variable list.
    const GUID: &'static str;
    const DESCRIPTION: &'static str = "";

    /// All variables, in the order they appear in `<ModelVariables>`.
    fn variables() -> Vec<Variable>;

    fn get_real(&self, _vr: u32) -> Option<f64> {
        None
    }

    fn get_integer(&self, _vr: u32) -> Option<i32> {
        None
    }

    fn get_boolean(&self, _vr: u32) -> Option<bool> {
        None
    }

    fn set_real(&mut self, vr: u32, _value: f64) -> Result<(), ModelError> {
        Err(ModelError::UnknownValueReference(vr))
    }

    fn set_integer(&mut self, vr: u32, _value: i32) -> Result<(), ModelError> {
        Err(ModelError::UnknownValueReference(vr))
    }

    fn set_boolean(&mut self, vr: u32, _value: bool) -> Result<(), ModelError> {
        Err(ModelError::UnknownValueReference(vr))
    }
}

/// How a communication step ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepResult {
    /// The step reached `time + step_size`.
    Completed,
    /// The model stopped at `time` inside the step and wants the simulation to end.
    Terminated { time: f64 },
}

/// User-defined model behavior.
///
/// This trait is hand-implemented to define the dynamics of the model.
pub trait UserModel: Model {
    /// Called when leaving initialization mode, after parameters and start values are set.
    fn initialize(&mut self, _start_time: f64) -> Result<(), ModelError> {
        Ok(())
    }

    /// Advance the model from `time` to `time + step_size`.
    fn do_step(&mut self, time: f64, step_size: f64) -> Result<StepResult, ModelError>;
}
