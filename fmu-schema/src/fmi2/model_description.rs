use std::str::FromStr;

use crate::{traits::FmiModelDescription, Error};

use super::{
    CoSimulation, Fmi2Unit, ModelExchange, ScalarVariable, ScalarVariableElement, SimpleType,
};

#[derive(Default, Debug, PartialEq, hard_xml::XmlRead)]
#[xml(tag = "fmiModelDescription")]
pub struct Fmi2ModelDescription {
    /// Version of FMI (Clarification for FMI 2.0.2: for FMI 2.0.x revisions fmiVersion is defined
    /// as "2.0").
    #[xml(attr = "fmiVersion")]
    pub fmi_version: String,

    /// The name of the model as used in the modeling environment that generated the XML file, such
    /// as Modelica.Mechanics.Rotational.Examples.CoupledClutches.
    #[xml(attr = "modelName")]
    pub model_name: String,

    /// Fingerprint of xml-file content to verify that xml-file and C-functions are compatible to
    /// each other
    #[xml(attr = "guid")]
    pub guid: String,

    #[xml(attr = "description")]
    pub description: Option<String>,

    #[xml(attr = "author")]
    pub author: Option<String>,

    /// Version of FMU, e.g., "1.4.1"
    #[xml(attr = "version")]
    pub version: Option<String>,

    #[xml(attr = "copyright")]
    pub copyright: Option<String>,

    #[xml(attr = "license")]
    pub license: Option<String>,

    /// Name of the tool that generated the XML file.
    #[xml(attr = "generationTool")]
    pub generation_tool: Option<String>,

    #[xml(attr = "generationDateAndTime")]
    pub generation_date_and_time: Option<String>,

    /// Defines whether the variable names in <ModelVariables> and in <TypeDefinitions> follow a
    /// particular convention.
    #[xml(attr = "variableNamingConvention")]
    pub variable_naming_convention: Option<String>,

    #[xml(default, attr = "numberOfEventIndicators")]
    pub number_of_event_indicators: u32,

    /// If present, the FMU is based on FMI for Model Exchange
    #[xml(child = "ModelExchange")]
    pub model_exchange: Option<ModelExchange>,

    /// If present, the FMU is based on FMI for Co-Simulation
    #[xml(child = "CoSimulation")]
    pub co_simulation: Option<CoSimulation>,

    #[xml(child = "UnitDefinitions")]
    pub unit_definitions: Option<UnitDefinitions>,

    #[xml(child = "TypeDefinitions")]
    pub type_definitions: Option<TypeDefinitions>,

    #[xml(child = "LogCategories")]
    pub log_categories: Option<LogCategories>,

    /// Providing default settings for the integrator, such as stop time and relative tolerance.
    #[xml(child = "DefaultExperiment")]
    pub default_experiment: Option<DefaultExperiment>,

    #[xml(child = "ModelVariables")]
    pub model_variables: ModelVariables,

    /// The model structure defines the dependency structure of the model variables.
    #[xml(child = "ModelStructure")]
    pub model_structure: ModelStructure,
}

impl FromStr for Fmi2ModelDescription {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::deserialize(s)
    }
}

impl FmiModelDescription for Fmi2ModelDescription {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn version_string(&self) -> &str {
        &self.fmi_version
    }
}

impl crate::traits::DefaultExperiment for Fmi2ModelDescription {
    fn start_time(&self) -> Option<f64> {
        self.default_experiment.as_ref().and_then(|de| de.start_time)
    }

    fn stop_time(&self) -> Option<f64> {
        self.default_experiment.as_ref().and_then(|de| de.stop_time)
    }

    fn tolerance(&self) -> Option<f64> {
        self.default_experiment.as_ref().and_then(|de| de.tolerance)
    }

    fn step_size(&self) -> Option<f64> {
        self.default_experiment.as_ref().and_then(|de| de.step_size)
    }
}

impl Fmi2ModelDescription {
    /// Total number of variables
    pub fn num_variables(&self) -> usize {
        self.model_variables.variables.len()
    }

    /// Get the number of continuous states (and derivatives)
    pub fn num_states(&self) -> usize {
        self.model_structure
            .derivatives
            .as_ref()
            .map_or(0, |d| d.unknowns.len())
    }

    pub fn num_event_indicators(&self) -> usize {
        self.number_of_event_indicators as usize
    }

    /// Get a iterator of the ScalarVariables
    pub fn get_model_variables(&self) -> impl Iterator<Item = &ScalarVariable> {
        self.model_variables.variables.iter()
    }

    pub fn model_variable_by_name(&self, name: &str) -> Result<&ScalarVariable, Error> {
        self.model_variables
            .variables
            .iter()
            .find(|var| var.name == name)
            .ok_or_else(|| Error::VariableNotFound(name.to_owned()))
    }

    /// Look up a variable by its 1-based index into `ModelVariables`, as used by `Unknown.index`
    /// and `Real.derivative`.
    pub fn model_variable_by_index(&self, index: u32) -> Result<&ScalarVariable, Error> {
        (index as usize)
            .checked_sub(1)
            .and_then(|idx| self.model_variables.variables.get(idx))
            .ok_or_else(|| Error::Model(format!("No variable at index {index}")))
    }

    /// All variables with causality `output`, in declaration order.
    pub fn outputs(&self) -> impl Iterator<Item = &ScalarVariable> {
        self.model_variables
            .variables
            .iter()
            .filter(|var| var.causality == super::Causality::Output)
    }

    /// Pairs of `(state, derivative)` for every continuous-time state, in the order of
    /// `ModelStructure/Derivatives`.
    pub fn continuous_states(&self) -> Result<Vec<(&ScalarVariable, &ScalarVariable)>, Error> {
        let Some(derivatives) = &self.model_structure.derivatives else {
            return Ok(vec![]);
        };
        derivatives
            .unknowns
            .iter()
            .map(|unknown| {
                let der = self.model_variable_by_index(unknown.index)?;
                match &der.elem {
                    ScalarVariableElement::Real(real) => {
                        let state_idx = real.derivative.ok_or_else(|| {
                            Error::Model(format!("Variable {} is not a derivative", der.name))
                        })?;
                        Ok((self.model_variable_by_index(state_idx)?, der))
                    }
                    other => Err(Error::Model(format!(
                        "Derivative {} must be Real, found {}",
                        der.name,
                        other.type_name()
                    ))),
                }
            })
            .collect()
    }

    pub fn simple_type_by_name(&self, name: &str) -> Option<&SimpleType> {
        self.type_definitions
            .as_ref()
            .and_then(|td| td.types.iter().find(|t| t.name == name))
    }

    pub fn unit_by_name(&self, name: &str) -> Option<&Fmi2Unit> {
        self.unit_definitions
            .as_ref()
            .and_then(|ud| ud.units.iter().find(|u| u.name == name))
    }

    /// The unit of a variable: its own `unit` attribute, falling back to the unit of its declared
    /// type.
    pub fn unit_of<'a>(&'a self, var: &'a ScalarVariable) -> Option<&'a str> {
        var.own_unit().or_else(|| {
            var.elem
                .declared_type()
                .and_then(|name| self.simple_type_by_name(name))
                .and_then(SimpleType::unit)
        })
    }

    /// Convert `value` given in `unit` into the unit of the variable `name`.
    ///
    /// `unit` is either the variable's own unit (no conversion) or one of the display units
    /// defined for it in `UnitDefinitions`, in which case `value = (display - offset) / factor`.
    pub fn convert_from_display(&self, name: &str, value: f64, unit: &str) -> Result<f64, Error> {
        let var = self.model_variable_by_name(name)?;
        let unknown_unit = || Error::UnknownUnit {
            variable: name.to_owned(),
            unit: unit.to_owned(),
        };

        let var_unit = self.unit_of(var).ok_or_else(unknown_unit)?;
        if var_unit == unit {
            return Ok(value);
        }

        self.unit_by_name(var_unit)
            .and_then(|u| u.display_unit_by_name(unit))
            .map(|du| du.to_unit(value))
            .ok_or_else(unknown_unit)
    }
}

#[derive(Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "UnitDefinitions")]
pub struct UnitDefinitions {
    #[xml(child = "Unit")]
    pub units: Vec<Fmi2Unit>,
}

#[derive(Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "TypeDefinitions")]
pub struct TypeDefinitions {
    #[xml(child = "SimpleType")]
    pub types: Vec<SimpleType>,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "LogCategories")]
pub struct LogCategories {
    #[xml(child = "Category")]
    pub categories: Vec<Category>,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "Category")]
pub struct Category {
    #[xml(attr = "name")]
    pub name: String,

    #[xml(attr = "description")]
    pub description: Option<String>,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "DefaultExperiment")]
pub struct DefaultExperiment {
    #[xml(attr = "startTime")]
    pub start_time: Option<f64>,

    #[xml(attr = "stopTime")]
    pub stop_time: Option<f64>,

    #[xml(attr = "tolerance")]
    pub tolerance: Option<f64>,

    #[xml(attr = "stepSize")]
    pub step_size: Option<f64>,
}

#[derive(Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "ModelVariables")]
pub struct ModelVariables {
    #[xml(child = "ScalarVariable")]
    pub variables: Vec<ScalarVariable>,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "Unknown")]
pub struct Fmi2Unknown {
    /// 1-based index into `ModelVariables`
    #[xml(attr = "index")]
    pub index: u32,

    /// Whitespace separated list of 1-based variable indices the unknown depends on
    #[xml(attr = "dependencies")]
    pub dependencies: Option<String>,

    #[xml(attr = "dependenciesKind")]
    pub dependencies_kind: Option<String>,
}

impl Fmi2Unknown {
    /// `None` when the dependencies are not declared, which means "depends on everything".
    pub fn dependency_indices(&self) -> Option<Result<Vec<u32>, Error>> {
        self.dependencies.as_ref().map(|deps| {
            deps.split_whitespace()
                .map(|d| {
                    d.parse::<u32>()
                        .map_err(|e| Error::Model(format!("Bad dependency index {d}: {e}")))
                })
                .collect()
        })
    }
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "Outputs")]
pub struct Outputs {
    #[xml(child = "Unknown")]
    pub unknowns: Vec<Fmi2Unknown>,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "Derivatives")]
pub struct Derivatives {
    #[xml(child = "Unknown")]
    pub unknowns: Vec<Fmi2Unknown>,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "InitialUnknowns")]
pub struct InitialUnknowns {
    #[xml(child = "Unknown")]
    pub unknowns: Vec<Fmi2Unknown>,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "ModelStructure")]
pub struct ModelStructure {
    #[xml(child = "Outputs")]
    pub outputs: Option<Outputs>,

    #[xml(child = "Derivatives")]
    pub derivatives: Option<Derivatives>,

    #[xml(child = "InitialUnknowns")]
    pub initial_unknowns: Option<InitialUnknowns>,
}
