use crate::variable_counts::{Counts, VariableCounts};

use super::{Causality, Fmi2ModelDescription, ScalarVariableElement, Variability};

impl VariableCounts for Fmi2ModelDescription {
    fn model_counts(&self) -> Counts {
        self.get_model_variables()
            .fold(Counts::default(), |mut cts, sv| {
                match sv.variability {
                    Variability::Constant => cts.num_constants += 1,
                    Variability::Continuous => cts.num_continuous += 1,
                    Variability::Discrete => cts.num_discrete += 1,
                    Variability::Fixed | Variability::Tunable => {}
                }
                match sv.causality {
                    Causality::CalculatedParameter => cts.num_calculated_parameters += 1,
                    Causality::Parameter => cts.num_parameters += 1,
                    Causality::Input => cts.num_inputs += 1,
                    Causality::Output => cts.num_outputs += 1,
                    Causality::Local => cts.num_local += 1,
                    Causality::Independent => cts.num_independent += 1,
                }
                match sv.elem {
                    ScalarVariableElement::Real(_) => cts.num_real_vars += 1,
                    ScalarVariableElement::Integer(_) => cts.num_integer_vars += 1,
                    ScalarVariableElement::Enumeration(_) => cts.num_enum_vars += 1,
                    ScalarVariableElement::Boolean(_) => cts.num_bool_vars += 1,
                    ScalarVariableElement::String(_) => cts.num_string_vars += 1,
                }
                cts
            })
    }
}
