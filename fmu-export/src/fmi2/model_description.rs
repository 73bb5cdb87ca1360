use std::fmt::Display;

use fmu::fmi2::schema::Causality;

use super::{
    traits::{Model, Start},
    LOG_CATEGORY_ERROR, LOG_CATEGORY_EVENTS,
};

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn attr(out: &mut String, name: &str, value: impl Display) {
    out.push_str(&format!(" {name}=\"{}\"", escape(&value.to_string())));
}

/// Render `modelDescription.xml` for `M`.
///
/// Parameters and inputs carry their start value, outputs and locals are `initial="calculated"`.
/// Every output is listed in `<ModelStructure>` without declared dependencies.
pub fn model_description<M: Model>() -> String {
    let variables = M::variables();
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<fmiModelDescription");
    attr(&mut xml, "fmiVersion", "2.0");
    attr(&mut xml, "modelName", M::MODEL_NAME);
    attr(&mut xml, "guid", M::GUID);
    if !M::DESCRIPTION.is_empty() {
        attr(&mut xml, "description", M::DESCRIPTION);
    }
    attr(
        &mut xml,
        "generationTool",
        format!("fmu-export {}", env!("CARGO_PKG_VERSION")),
    );
    attr(&mut xml, "variableNamingConvention", "structured");
    attr(&mut xml, "numberOfEventIndicators", 0);
    xml.push_str(">\n  <CoSimulation");
    attr(&mut xml, "modelIdentifier", M::MODEL_IDENTIFIER);
    attr(&mut xml, "canHandleVariableCommunicationStepSize", true);
    xml.push_str("/>\n");

    let mut units = variables.iter().filter_map(|v| v.unit).collect::<Vec<_>>();
    units.sort_unstable();
    units.dedup();
    if !units.is_empty() {
        xml.push_str("  <UnitDefinitions>\n");
        for unit in units {
            xml.push_str("    <Unit");
            attr(&mut xml, "name", unit);
            xml.push_str("/>\n");
        }
        xml.push_str("  </UnitDefinitions>\n");
    }

    xml.push_str("  <LogCategories>\n");
    for category in [LOG_CATEGORY_EVENTS, LOG_CATEGORY_ERROR] {
        xml.push_str("    <Category");
        attr(&mut xml, "name", category);
        xml.push_str("/>\n");
    }
    xml.push_str("  </LogCategories>\n");

    xml.push_str("  <ModelVariables>\n");
    for var in &variables {
        xml.push_str("    <ScalarVariable");
        attr(&mut xml, "name", var.name);
        attr(&mut xml, "valueReference", var.value_reference);
        if let Some(description) = var.description {
            attr(&mut xml, "description", description);
        }
        attr(&mut xml, "causality", var.causality);
        attr(&mut xml, "variability", var.variability);
        match var.causality {
            Causality::Parameter => attr(&mut xml, "initial", "exact"),
            Causality::Output | Causality::Local => attr(&mut xml, "initial", "calculated"),
            _ => {}
        }
        xml.push_str(">\n      <");
        xml.push_str(var.start.type_name());
        if let Some(unit) = var.unit {
            attr(&mut xml, "unit", unit);
        }
        if var.has_start() {
            match var.start {
                Start::Real(Some(v)) => attr(&mut xml, "start", v),
                Start::Integer(Some(v)) => attr(&mut xml, "start", v),
                Start::Boolean(Some(v)) => attr(&mut xml, "start", v),
                _ => {}
            }
        }
        xml.push_str("/>\n    </ScalarVariable>\n");
    }
    xml.push_str("  </ModelVariables>\n");

    xml.push_str("  <ModelStructure>\n");
    let outputs = variables
        .iter()
        .enumerate()
        .filter(|(_, v)| v.causality == Causality::Output)
        .map(|(i, _)| i + 1)
        .collect::<Vec<_>>();
    if !outputs.is_empty() {
        xml.push_str("    <Outputs>\n");
        for index in &outputs {
            xml.push_str("      <Unknown");
            attr(&mut xml, "index", index);
            xml.push_str("/>\n");
        }
        xml.push_str("    </Outputs>\n    <InitialUnknowns>\n");
        for index in &outputs {
            xml.push_str("      <Unknown");
            attr(&mut xml, "index", index);
            xml.push_str("/>\n");
        }
        xml.push_str("    </InitialUnknowns>\n");
    }
    xml.push_str("  </ModelStructure>\n</fmiModelDescription>\n");
    xml
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use fmu::fmi2::schema::{Fmi2ModelDescription, ScalarVariableElement, Variability};

    use super::*;
    use crate::fmi2::Variable;

    #[derive(Default)]
    struct Quoted;

    impl Model for Quoted {
        const MODEL_NAME: &'static str = "A <quoted> & \"odd\" model";
        const MODEL_IDENTIFIER: &'static str = "quoted";
        const GUID: &'static str = "{0d1c}";

        fn variables() -> Vec<Variable> {
            vec![
                Variable::real("gain", 0)
                    .causality(Causality::Parameter)
                    .variability(Variability::Fixed)
                    .unit("V/V")
                    .start(Start::Real(Some(2.5))),
                Variable::boolean("enabled", 0)
                    .causality(Causality::Input)
                    .start(Start::Boolean(Some(true))),
                Variable::real("y", 1)
                    .causality(Causality::Output)
                    .unit("V")
                    .description("a 'scaled' value"),
                Variable::integer("count", 0).causality(Causality::Local),
            ]
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a<b>&"c"'"#), "a&lt;b&gt;&amp;&quot;c&quot;&apos;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_parses_back() {
        let xml = model_description::<Quoted>();
        let md = Fmi2ModelDescription::from_str(&xml).unwrap();

        assert_eq!(md.fmi_version, "2.0");
        assert_eq!(md.model_name, Quoted::MODEL_NAME);
        assert_eq!(md.guid, "{0d1c}");
        let cs = md.co_simulation.as_ref().unwrap();
        assert_eq!(cs.model_identifier, "quoted");
        assert!(cs.can_handle_variable_communication_step_size);
        assert!(md.model_exchange.is_none());

        let units = &md.unit_definitions.as_ref().unwrap().units;
        assert_eq!(
            units.iter().map(|u| u.name.as_str()).collect::<Vec<_>>(),
            ["V", "V/V"]
        );

        assert_eq!(md.num_variables(), 4);
        let gain = md.model_variable_by_name("gain").unwrap();
        assert_eq!(gain.causality, Causality::Parameter);
        assert_eq!(gain.variability, Variability::Fixed);
        match &gain.elem {
            ScalarVariableElement::Real(r) => {
                assert_eq!(r.start, Some(2.5));
                assert_eq!(r.unit.as_deref(), Some("V/V"));
            }
            other => panic!("Unexpected element {other:?}"),
        }
        let enabled = md.model_variable_by_name("enabled").unwrap();
        assert!(enabled.initial.is_none());
        assert!(matches!(
            &enabled.elem,
            ScalarVariableElement::Boolean(b) if b.start == Some(true)
        ));

        let y = md.model_variable_by_name("y").unwrap();
        assert_eq!(y.description.as_deref(), Some("a 'scaled' value"));
        assert_eq!(y.variability, Variability::Continuous);
        assert!(matches!(&y.elem, ScalarVariableElement::Real(r) if r.start.is_none()));

        let count = md.model_variable_by_name("count").unwrap();
        assert_eq!(count.variability, Variability::Discrete);

        let outputs = md.outputs().map(|v| v.name.as_str()).collect::<Vec<_>>();
        assert_eq!(outputs, ["y"]);
        let log_categories = &md.log_categories.as_ref().unwrap().categories;
        assert_eq!(log_categories.len(), 2);
    }
}
