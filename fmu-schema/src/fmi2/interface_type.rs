#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "File")]
pub struct File {
    /// Name of the file including the path relative to the sources directory, using the forward
    /// slash as separator (for example: name = "myFMU.c"; name = "modelExchange/solve.c")
    #[xml(attr = "name")]
    pub name: String,
}

/// List of source file names that are present in the "sources" directory of the FMU and need to
/// be compiled in order to generate the binary of the FMU.
#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "SourceFiles")]
pub struct SourceFiles {
    #[xml(child = "File")]
    pub files: Vec<File>,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "ModelExchange")]
pub struct ModelExchange {
    /// Short class name according to C-syntax
    #[xml(attr = "modelIdentifier")]
    pub model_identifier: String,

    /// If true, a tool is needed to execute the model and the FMU just contains the communication
    /// to this tool.
    #[xml(default, attr = "needsExecutionTool")]
    pub needs_execution_tool: bool,

    #[xml(default, attr = "completedIntegratorStepNotNeeded")]
    pub completed_integrator_step_not_needed: bool,

    #[xml(default, attr = "canBeInstantiatedOnlyOncePerProcess")]
    pub can_be_instantiated_only_once_per_process: bool,

    #[xml(default, attr = "canNotUseMemoryManagementFunctions")]
    pub can_not_use_memory_management_functions: bool,

    #[xml(default, attr = "canGetAndSetFMUState")]
    pub can_get_and_set_fmu_state: bool,

    #[xml(default, attr = "canSerializeFMUState")]
    pub can_serialize_fmu_state: bool,

    /// If true, the directional derivative of the equations can be computed with
    /// fmi2GetDirectionalDerivative
    #[xml(default, attr = "providesDirectionalDerivative")]
    pub provides_directional_derivative: bool,

    #[xml(child = "SourceFiles")]
    pub source_files: Option<SourceFiles>,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "CoSimulation")]
pub struct CoSimulation {
    /// Short class name according to C-syntax
    #[xml(attr = "modelIdentifier")]
    pub model_identifier: String,

    #[xml(default, attr = "needsExecutionTool")]
    pub needs_execution_tool: bool,

    /// The slave is able to handle variable communication step sizes.
    #[xml(default, attr = "canHandleVariableCommunicationStepSize")]
    pub can_handle_variable_communication_step_size: bool,

    /// The slave is able to interpolate continuous inputs.
    #[xml(default, attr = "canInterpolateInputs")]
    pub can_interpolate_inputs: bool,

    /// The slave is able to provide derivatives of outputs with maximum order.
    #[xml(default, attr = "maxOutputDerivativeOrder")]
    pub max_output_derivative_order: u32,

    #[xml(default, attr = "canRunAsynchronuously")]
    pub can_run_asynchronuously: bool,

    #[xml(default, attr = "canBeInstantiatedOnlyOncePerProcess")]
    pub can_be_instantiated_only_once_per_process: bool,

    #[xml(default, attr = "canNotUseMemoryManagementFunctions")]
    pub can_not_use_memory_management_functions: bool,

    #[xml(default, attr = "canGetAndSetFMUState")]
    pub can_get_and_set_fmu_state: bool,

    #[xml(default, attr = "canSerializeFMUState")]
    pub can_serialize_fmu_state: bool,

    #[xml(default, attr = "providesDirectionalDerivative")]
    pub provides_directional_derivative: bool,

    #[xml(child = "SourceFiles")]
    pub source_files: Option<SourceFiles>,
}

/// Common access to the interface elements that can carry `<SourceFiles>`.
pub trait InterfaceType {
    fn model_identifier(&self) -> &str;
    fn source_files(&self) -> Option<&SourceFiles>;

    /// Source file names relative to the `sources/` directory.
    fn source_file_names(&self) -> Vec<&str> {
        self.source_files()
            .map(|sf| sf.files.iter().map(|f| f.name.as_str()).collect())
            .unwrap_or_default()
    }
}

impl InterfaceType for ModelExchange {
    fn model_identifier(&self) -> &str {
        &self.model_identifier
    }

    fn source_files(&self) -> Option<&SourceFiles> {
        self.source_files.as_ref()
    }
}

impl InterfaceType for CoSimulation {
    fn model_identifier(&self) -> &str {
        &self.model_identifier
    }

    fn source_files(&self) -> Option<&SourceFiles> {
        self.source_files.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use hard_xml::XmlRead;

    use super::*;

    #[test]
    fn test_co_simulation() {
        let xml = r#"
        <CoSimulation modelIdentifier="Rectifier" canHandleVariableCommunicationStepSize="true"
            canGetAndSetFMUState="true" maxOutputDerivativeOrder="1">
            <SourceFiles>
                <File name="all.c"/>
                <File name="solver/euler.c"/>
            </SourceFiles>
        </CoSimulation>"#;

        let cs = CoSimulation::from_str(xml).unwrap();
        assert_eq!(cs.model_identifier(), "Rectifier");
        assert!(cs.can_handle_variable_communication_step_size);
        assert!(!cs.can_interpolate_inputs);
        assert_eq!(cs.max_output_derivative_order, 1);
        assert_eq!(cs.source_file_names(), vec!["all.c", "solver/euler.c"]);
    }

    #[test]
    fn test_model_exchange_without_sources() {
        let xml = r#"<ModelExchange modelIdentifier="Rectifier"/>"#;
        let me = ModelExchange::from_str(xml).unwrap();
        assert_eq!(me.model_identifier(), "Rectifier");
        assert!(me.source_file_names().is_empty());
    }
}
