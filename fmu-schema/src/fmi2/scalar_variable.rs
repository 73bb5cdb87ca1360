use super::attr_enum;

/// Enumeration that defines the causality of the variable.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum Causality {
    Parameter,
    CalculatedParameter,
    Input,
    Output,
    #[default]
    Local,
    Independent,
}

attr_enum!(Causality {
    Parameter => "parameter",
    CalculatedParameter => "calculatedParameter",
    Input => "input",
    Output => "output",
    Local => "local",
    Independent => "independent",
});

/// Enumeration that defines the time dependency of the variable, in other words it defines the
/// time instants when a variable can change its value.
///
/// The default is [`Variability::Continuous`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum Variability {
    /// The value of the variable never changes.
    Constant,
    /// The value of the variable is fixed after initialization.
    Fixed,
    /// The value of the variable is constant between external events (ModelExchange) and between
    /// Communication Points (CoSimulation) due to changing variables with causality = "parameter"
    /// or "input" and variability = "tunable".
    Tunable,
    /// The value only changes at events (ModelExchange) or Communication Points (CoSimulation).
    Discrete,
    /// Only a variable of type = "Real" can be "continuous".
    #[default]
    Continuous,
}

attr_enum!(Variability {
    Constant => "constant",
    Fixed => "fixed",
    Tunable => "tunable",
    Discrete => "discrete",
    Continuous => "continuous",
});

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Initial {
    Exact,
    Approx,
    Calculated,
}

attr_enum!(Initial {
    Exact => "exact",
    Approx => "approx",
    Calculated => "calculated",
});

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "Real")]
pub struct Real {
    /// If present, name of type defined with TypeDefinitions / SimpleType providing defaults.
    #[xml(attr = "declaredType")]
    pub declared_type: Option<String>,

    #[xml(attr = "quantity")]
    pub quantity: Option<String>,

    #[xml(attr = "unit")]
    pub unit: Option<String>,

    /// Default display unit, provided the conversion of values in "unit" to values in
    /// "displayUnit" is defined in UnitDefinitions / Unit / DisplayUnit.
    #[xml(attr = "displayUnit")]
    pub display_unit: Option<String>,

    /// If relativeQuantity=true, offset for displayUnit must be ignored.
    #[xml(attr = "relativeQuantity")]
    pub relative_quantity: Option<bool>,

    #[xml(attr = "min")]
    pub min: Option<f64>,

    #[xml(attr = "max")]
    pub max: Option<f64>,

    #[xml(attr = "nominal")]
    pub nominal: Option<f64>,

    /// Value before initialization, if initial=exact or approx.
    /// max >= start >= min required
    #[xml(attr = "start")]
    pub start: Option<f64>,

    /// If present, this variable is the derivative of variable with ScalarVariable index
    /// "derivative".
    #[xml(attr = "derivative")]
    pub derivative: Option<u32>,

    /// Only for ModelExchange and if variable is a continuous-time state:
    /// If true, state can be reinitialized at an event by the FMU
    #[xml(default, attr = "reinit")]
    pub reinit: bool,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "Integer")]
pub struct Integer {
    #[xml(attr = "declaredType")]
    pub declared_type: Option<String>,

    #[xml(attr = "quantity")]
    pub quantity: Option<String>,

    #[xml(attr = "min")]
    pub min: Option<i32>,

    #[xml(attr = "max")]
    pub max: Option<i32>,

    #[xml(attr = "start")]
    pub start: Option<i32>,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "Boolean")]
pub struct Boolean {
    #[xml(attr = "declaredType")]
    pub declared_type: Option<String>,

    #[xml(attr = "start")]
    pub start: Option<bool>,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "String")]
pub struct FmiString {
    #[xml(attr = "declaredType")]
    pub declared_type: Option<String>,

    #[xml(attr = "start")]
    pub start: Option<String>,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "Enumeration")]
pub struct Enumeration {
    #[xml(attr = "declaredType")]
    pub declared_type: String,

    #[xml(attr = "quantity")]
    pub quantity: Option<String>,

    #[xml(attr = "min")]
    pub min: Option<i32>,

    #[xml(attr = "max")]
    pub max: Option<i32>,

    #[xml(attr = "start")]
    pub start: Option<i32>,
}

#[derive(Clone, PartialEq, Debug, hard_xml::XmlRead)]
pub enum ScalarVariableElement {
    #[xml(tag = "Real")]
    Real(Real),
    #[xml(tag = "Integer")]
    Integer(Integer),
    #[xml(tag = "Boolean")]
    Boolean(Boolean),
    #[xml(tag = "String")]
    String(FmiString),
    #[xml(tag = "Enumeration")]
    Enumeration(Enumeration),
}

impl Default for ScalarVariableElement {
    fn default() -> Self {
        Self::Real(Real::default())
    }
}

impl ScalarVariableElement {
    /// Name of the element as it appears in the XML.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarVariableElement::Real(_) => "Real",
            ScalarVariableElement::Integer(_) => "Integer",
            ScalarVariableElement::Boolean(_) => "Boolean",
            ScalarVariableElement::String(_) => "String",
            ScalarVariableElement::Enumeration(_) => "Enumeration",
        }
    }

    pub fn declared_type(&self) -> Option<&str> {
        match self {
            ScalarVariableElement::Real(r) => r.declared_type.as_deref(),
            ScalarVariableElement::Integer(i) => i.declared_type.as_deref(),
            ScalarVariableElement::Boolean(b) => b.declared_type.as_deref(),
            ScalarVariableElement::String(s) => s.declared_type.as_deref(),
            ScalarVariableElement::Enumeration(e) => Some(&e.declared_type),
        }
    }
}

#[cfg(feature = "arrow")]
impl ScalarVariableElement {
    pub fn data_type(&self) -> arrow::datatypes::DataType {
        match self {
            ScalarVariableElement::Real(_) => arrow::datatypes::DataType::Float64,
            ScalarVariableElement::Integer(_) => arrow::datatypes::DataType::Int32,
            ScalarVariableElement::Boolean(_) => arrow::datatypes::DataType::Boolean,
            ScalarVariableElement::String(_) => arrow::datatypes::DataType::Utf8,
            ScalarVariableElement::Enumeration(_) => arrow::datatypes::DataType::Int32,
        }
    }
}

#[derive(Clone, Default, Debug, PartialEq, hard_xml::XmlRead)]
#[xml(tag = "ScalarVariable")]
pub struct ScalarVariable {
    /// The full, unique name of the variable.
    #[xml(attr = "name")]
    pub name: String,

    /// A handle of the variable to efficiently identify the variable value in the model interface.
    #[xml(attr = "valueReference")]
    pub value_reference: u32,

    /// An optional description string describing the meaning of the variable.
    #[xml(attr = "description")]
    pub description: Option<String>,

    /// Enumeration that defines the causality of the variable.
    #[xml(default, attr = "causality")]
    pub causality: Causality,

    /// Enumeration that defines the time dependency of the variable.
    #[xml(default, attr = "variability")]
    pub variability: Variability,

    /// Enumeration that defines how the variable is initialized. It is not allowed to provide a
    /// value for initial if `causality`=`Input` or `Independent`.
    #[xml(attr = "initial")]
    pub initial: Option<Initial>,

    #[xml(
        child = "Real",
        child = "Integer",
        child = "Boolean",
        child = "String",
        child = "Enumeration"
    )]
    pub elem: ScalarVariableElement,
}

impl ScalarVariable {
    pub fn is_continuous_input(&self) -> bool {
        matches!(
            (&self.elem, &self.causality),
            (ScalarVariableElement::Real { .. }, Causality::Input)
        )
    }

    /// The `unit` attribute given directly on the variable, if any.
    pub fn own_unit(&self) -> Option<&str> {
        match &self.elem {
            ScalarVariableElement::Real(r) => r.unit.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use hard_xml::XmlRead;

    use super::*;

    #[test]
    fn test_scalar_variable() {
        let s = r#"
        <ScalarVariable
            name="inertia1.J"
            valueReference="1073741824"
            description="Moment of load inertia"
            causality="parameter"
            variability="fixed">
            <Real declaredType="Modelica.SIunits.Inertia" start="1"/>
        </ScalarVariable>
        "#;
        let sv = ScalarVariable::from_str(s).unwrap();
        assert_eq!(sv.name, "inertia1.J");
        assert_eq!(sv.value_reference, 1073741824);
        assert_eq!(sv.description.as_deref(), Some("Moment of load inertia"));
        assert_eq!(sv.causality, Causality::Parameter);
        assert_eq!(sv.variability, Variability::Fixed);
        assert_eq!(sv.initial, None);
        assert_eq!(
            sv.elem,
            ScalarVariableElement::Real(Real {
                declared_type: Some("Modelica.SIunits.Inertia".to_string()),
                start: Some(1.0),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_defaults_and_string_variable() {
        let s = r#"<ScalarVariable name="binfilename" valueReference="3" causality="parameter"
            variability="tunable" initial="exact"><String start="out.bin"/></ScalarVariable>"#;
        let sv = ScalarVariable::from_str(s).unwrap();
        assert_eq!(sv.variability, Variability::Tunable);
        assert_eq!(sv.initial, Some(Initial::Exact));
        assert_eq!(sv.elem.type_name(), "String");
        assert_eq!(
            sv.elem,
            ScalarVariableElement::String(FmiString {
                declared_type: None,
                start: Some("out.bin".to_owned())
            })
        );

        let s = r#"<ScalarVariable name="x" valueReference="0"><Real derivative="2"/></ScalarVariable>"#;
        let sv = ScalarVariable::from_str(s).unwrap();
        assert_eq!(sv.causality, Causality::Local);
        assert_eq!(sv.variability, Variability::Continuous);
    }

    #[test]
    fn test_invalid_causality() {
        let s = r#"<ScalarVariable name="x" valueReference="0" causality="sideways"><Real/></ScalarVariable>"#;
        assert!(ScalarVariable::from_str(s).is_err());
    }
}
