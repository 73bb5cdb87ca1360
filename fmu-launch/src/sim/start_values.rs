//! Start values: resolving names against the model description, and setting them on an instance.

use std::{collections::BTreeMap, ffi::CString};

use fmu::fmi2::{
    binding,
    instance::Common,
    schema::{Fmi2ModelDescription, ScalarVariableElement},
};

use crate::{config::StartValueSpec, Error};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Real(f64),
    Integer(i32),
    Boolean(bool),
    String(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Real(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "'{v}'"),
        }
    }
}

/// A start value checked against the model description, in the variable's own unit.
#[derive(Debug, Clone, PartialEq)]
pub struct StartValue {
    pub name: String,
    pub vr: binding::fmi2ValueReference,
    pub value: Value,
}

/// Resolve `spec` for the variable `name`.
pub fn resolve(
    md: &Fmi2ModelDescription,
    name: &str,
    spec: &StartValueSpec,
) -> Result<StartValue, Error> {
    use ScalarVariableElement as Elem;
    use StartValueSpec as Spec;

    let var = md.model_variable_by_name(name)?;
    let invalid = |reason: String| Error::InvalidStartValue {
        name: name.to_owned(),
        reason,
    };

    let value = match (&var.elem, spec) {
        (Elem::Real(_), Spec::Float(v)) => Value::Real(*v),
        (Elem::Real(_), Spec::Integer(i)) => Value::Real(*i as f64),
        (Elem::Real(_), Spec::WithUnit { value, unit }) => {
            Value::Real(md.convert_from_display(name, *value, unit)?)
        }
        (_, Spec::WithUnit { unit, .. }) => {
            return Err(Error::UnitOnNonReal {
                name: name.to_owned(),
                unit: unit.clone(),
            })
        }

        (Elem::Integer(_) | Elem::Enumeration(_), Spec::Integer(i)) => Value::Integer(
            i32::try_from(*i).map_err(|_| invalid(format!("{i} is out of range")))?,
        ),
        (Elem::Integer(_) | Elem::Enumeration(_), Spec::Float(v))
            if v.fract() == 0.0 && *v >= i32::MIN as f64 && *v <= i32::MAX as f64 =>
        {
            Value::Integer(*v as i32)
        }

        (Elem::Boolean(_), Spec::Boolean(b)) => Value::Boolean(*b),
        (Elem::Boolean(_), Spec::Integer(i @ (0 | 1))) => Value::Boolean(*i == 1),
        (Elem::Boolean(_), Spec::String(s)) if s == "true" || s == "false" => {
            Value::Boolean(s == "true")
        }

        (Elem::String(_), Spec::String(s)) => Value::String(s.clone()),
        (Elem::String(_), Spec::Boolean(b)) => Value::String(b.to_string()),
        (Elem::String(_), Spec::Integer(i)) => Value::String(i.to_string()),
        (Elem::String(_), Spec::Float(v)) => Value::String(v.to_string()),

        (elem, spec) => {
            return Err(invalid(format!(
                "{spec} is not a valid {} value",
                elem.type_name()
            )))
        }
    };

    Ok(StartValue {
        name: name.to_owned(),
        vr: var.value_reference,
        value,
    })
}

pub fn resolve_all(
    md: &Fmi2ModelDescription,
    specs: &BTreeMap<String, StartValueSpec>,
) -> Result<Vec<StartValue>, Error> {
    specs
        .iter()
        .map(|(name, spec)| resolve(md, name, spec))
        .collect()
}

/// Set the start values on an instance, before initialization.
pub fn apply<Inst: Common>(inst: &mut Inst, values: &[StartValue]) -> Result<(), Error> {
    for StartValue { name, vr, value } in values {
        log::debug!("Setting start value {name} = {value}");
        match value {
            Value::Real(v) => inst.set_real(&[*vr], &[*v])?,
            Value::Integer(v) => inst.set_integer(&[*vr], &[*v])?,
            Value::Boolean(v) => inst.set_boolean(&[*vr], &[*v as binding::fmi2Boolean])?,
            Value::String(v) => {
                let v = CString::new(v.as_str()).map_err(fmu::Error::from)?;
                inst.set_string(&[*vr], &[v])?
            }
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use float_cmp::assert_approx_eq;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn md() -> Fmi2ModelDescription {
        Fmi2ModelDescription::from_str(
            r#"<fmiModelDescription fmiVersion="2.0" modelName="M" guid="{0}">
                <UnitDefinitions>
                    <Unit name="s"><DisplayUnit name="ms" factor="1000"/></Unit>
                    <Unit name="K"><DisplayUnit name="degC" offset="-273.15"/></Unit>
                </UnitDefinitions>
                <TypeDefinitions>
                    <SimpleType name="Time"><Real unit="s"/></SimpleType>
                    <SimpleType name="Mode">
                        <Enumeration><Item name="a" value="1"/><Item name="b" value="2"/></Enumeration>
                    </SimpleType>
                </TypeDefinitions>
                <ModelVariables>
                    <ScalarVariable name="step" valueReference="1" causality="parameter" variability="fixed">
                        <Real declaredType="Time" start="0.001"/>
                    </ScalarVariable>
                    <ScalarVariable name="T" valueReference="2" causality="parameter" variability="fixed">
                        <Real unit="K" start="300"/>
                    </ScalarVariable>
                    <ScalarVariable name="n" valueReference="1" causality="parameter" variability="fixed">
                        <Integer start="1"/>
                    </ScalarVariable>
                    <ScalarVariable name="mode" valueReference="2" causality="parameter" variability="fixed">
                        <Enumeration declaredType="Mode" start="1"/>
                    </ScalarVariable>
                    <ScalarVariable name="on" valueReference="1" causality="parameter" variability="fixed">
                        <Boolean start="false"/>
                    </ScalarVariable>
                    <ScalarVariable name="file" valueReference="1" causality="parameter" variability="fixed">
                        <String start="out.bin"/>
                    </ScalarVariable>
                </ModelVariables>
                <ModelStructure/>
            </fmiModelDescription>"#,
        )
        .unwrap()
    }

    fn value(md: &Fmi2ModelDescription, name: &str, spec: &str) -> Result<Value, Error> {
        resolve(md, name, &spec.parse().unwrap()).map(|sv| sv.value)
    }

    #[rstest]
    fn test_real(md: Fmi2ModelDescription) {
        assert_eq!(value(&md, "step", "0.025").unwrap(), Value::Real(0.025));
        assert_eq!(value(&md, "step", "2").unwrap(), Value::Real(2.0));
        assert_eq!(value(&md, "step", "0.025[s]").unwrap(), Value::Real(0.025));

        let Value::Real(v) = value(&md, "step", "25[ms]").unwrap() else {
            panic!("expected Real");
        };
        assert_approx_eq!(f64, v, 0.025);

        let Value::Real(v) = value(&md, "T", "20[degC]").unwrap() else {
            panic!("expected Real");
        };
        assert_approx_eq!(f64, v, 293.15, epsilon = 1e-9);

        assert!(matches!(
            value(&md, "T", "1[ms]"),
            Err(Error::Schema(fmu::schema::Error::UnknownUnit { .. }))
        ));
        assert!(matches!(
            value(&md, "step", "true"),
            Err(Error::InvalidStartValue { .. })
        ));
    }

    #[rstest]
    fn test_integer(md: Fmi2ModelDescription) {
        assert_eq!(value(&md, "n", "5").unwrap(), Value::Integer(5));
        assert_eq!(value(&md, "n", "5.0").unwrap(), Value::Integer(5));
        assert_eq!(value(&md, "mode", "2").unwrap(), Value::Integer(2));
        assert!(matches!(
            value(&md, "n", "5.5"),
            Err(Error::InvalidStartValue { .. })
        ));
        assert!(matches!(
            value(&md, "n", "4294967296"),
            Err(Error::InvalidStartValue { .. })
        ));
        assert!(matches!(
            value(&md, "n", "5[s]"),
            Err(Error::UnitOnNonReal { .. })
        ));
    }

    #[rstest]
    fn test_boolean(md: Fmi2ModelDescription) {
        assert_eq!(value(&md, "on", "true").unwrap(), Value::Boolean(true));
        assert_eq!(value(&md, "on", "0").unwrap(), Value::Boolean(false));
        assert_eq!(value(&md, "on", "1").unwrap(), Value::Boolean(true));
        assert_eq!(value(&md, "on", "'false'").unwrap(), Value::Boolean(false));
        assert!(matches!(
            value(&md, "on", "2"),
            Err(Error::InvalidStartValue { .. })
        ));
    }

    #[rstest]
    fn test_string(md: Fmi2ModelDescription) {
        assert_eq!(
            value(&md, "file", "DISABLED").unwrap(),
            Value::String("DISABLED".to_owned())
        );
        assert_eq!(
            value(&md, "file", "'a b'").unwrap(),
            Value::String("a b".to_owned())
        );
        assert_eq!(value(&md, "file", "3").unwrap(), Value::String("3".to_owned()));
    }

    #[rstest]
    fn test_unknown_variable(md: Fmi2ModelDescription) {
        assert!(matches!(
            value(&md, "nope", "1"),
            Err(Error::Schema(fmu::schema::Error::VariableNotFound(name))) if name == "nope"
        ));
    }

    #[rstest]
    fn test_resolve_all(md: Fmi2ModelDescription) {
        let specs = BTreeMap::from([
            ("step".to_owned(), StartValueSpec::Float(0.5)),
            (
                "file".to_owned(),
                StartValueSpec::String("DISABLED".to_owned()),
            ),
        ]);
        let values = resolve_all(&md, &specs).unwrap();
        assert_eq!(
            values,
            vec![
                StartValue {
                    name: "file".to_owned(),
                    vr: 1,
                    value: Value::String("DISABLED".to_owned()),
                },
                StartValue {
                    name: "step".to_owned(),
                    vr: 1,
                    value: Value::Real(0.5),
                },
            ]
        );
    }
}
