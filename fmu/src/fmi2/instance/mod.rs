//! FMI 2.0 instance interface

use std::ffi::CString;

use crate::{
    traits::{FmiImport, FmiInstance},
    Error, InterfaceType,
};

use super::{binding, import::Fmi2Import, schema, CallbackFunctions, Fmi2Error};

mod co_simulation;
mod common;
mod model_exchange;
mod traits;

pub use crate::{CS, ME};
pub use traits::{CoSimulation, Common, ModelExchange};

pub type InstanceME<'a> = Instance<'a, ME>;
pub type InstanceCS<'a> = Instance<'a, CS>;

/// Selects the interface an [`Instance`] is created for.
pub trait InstanceTag {
    const TYPE: InterfaceType;
    const FMI_TYPE: binding::fmi2Type;
    /// Functions the library must export on top of the common ones
    const GROUP: binding::FunctionGroup;

    /// The model identifier of this interface, if the FMU provides it.
    fn model_identifier(md: &schema::Fmi2ModelDescription) -> Option<&str>;
}

impl InstanceTag for ME {
    const TYPE: InterfaceType = InterfaceType::ModelExchange;
    const FMI_TYPE: binding::fmi2Type = binding::fmi2Type_fmi2ModelExchange;
    const GROUP: binding::FunctionGroup = binding::FunctionGroup::ModelExchange;

    fn model_identifier(md: &schema::Fmi2ModelDescription) -> Option<&str> {
        md.model_exchange
            .as_ref()
            .map(|me| me.model_identifier.as_str())
    }
}

impl InstanceTag for CS {
    const TYPE: InterfaceType = InterfaceType::CoSimulation;
    const FMI_TYPE: binding::fmi2Type = binding::fmi2Type_fmi2CoSimulation;
    const GROUP: binding::FunctionGroup = binding::FunctionGroup::CoSimulation;

    fn model_identifier(md: &schema::Fmi2ModelDescription) -> Option<&str> {
        md.co_simulation
            .as_ref()
            .map(|cs| cs.model_identifier.as_str())
    }
}

pub struct Instance<'a, Tag: InstanceTag> {
    /// Copy of the instance name
    name: String,
    /// Pointer to the raw FMI 2.0 instance
    component: binding::fmi2Component,
    /// Raw FMI 2.0 bindings
    binding: binding::Fmi2Binding,
    /// Model description
    model_description: &'a schema::Fmi2ModelDescription,
    /// Callbacks struct, must outlive the component
    #[allow(dead_code)]
    callbacks: Box<CallbackFunctions>,
}

impl<'a, Tag: InstanceTag> Instance<'a, Tag> {
    /// Initialize a new Instance from an Import
    pub fn new(
        import: &'a Fmi2Import,
        instance_name: &str,
        visible: bool,
        logging_on: bool,
    ) -> Result<Self, Error> {
        let schema = import.model_description();

        let model_identifier =
            Tag::model_identifier(schema).ok_or(Error::UnsupportedFmuType(Tag::TYPE))?;

        let binding = import.binding(model_identifier)?;
        let missing = binding.missing_functions(Tag::GROUP);
        if !missing.is_empty() {
            log::debug!("{} functions not exported: {}", Tag::TYPE, missing.join(", "));
            return Err(Error::UnsupportedInterface(Tag::TYPE));
        }

        let callbacks = Box::<CallbackFunctions>::default();

        let name = instance_name.to_owned();
        let instance_name = CString::new(instance_name)?;
        let guid = CString::new(schema.guid.as_bytes())?;
        let resource_url = CString::new(import.resource_url()?.as_str())?;

        let component = unsafe {
            let callback_functions = &*callbacks as *const CallbackFunctions;
            binding.fmi2Instantiate(
                instance_name.as_ptr(),
                Tag::FMI_TYPE,
                guid.as_ptr(),                      // guid
                resource_url.as_ptr(),              // fmu_resource_location
                callback_functions as _,            // functions
                visible as binding::fmi2Boolean,    // visible
                logging_on as binding::fmi2Boolean, // logging_on
            )
        };
        if component.is_null() {
            return Err(Error::Instantiation);
        }
        log::trace!("Created FMI2.0 {} component {component:?}", Tag::TYPE);

        Ok(Self {
            name,
            component,
            binding,
            model_description: schema,
            callbacks,
        })
    }

    /// Check the internal consistency of the FMU by comparing the TypesPlatform and FMI versions
    /// from the library and the Model Description XML
    pub fn check_consistency(&self) -> Result<(), Error> {
        let types_platform = self.get_types_platform();
        if types_platform != "default" {
            return Err(Fmi2Error::TypesPlatformMismatch(types_platform.to_owned()).into());
        }

        let fmi_version = Common::get_version(self);
        if fmi_version != self.model_description.fmi_version {
            return Err(Error::FmiVersionMismatch {
                found: fmi_version.to_owned(),
                expected: self.model_description.fmi_version.to_owned(),
            });
        }

        Ok(())
    }
}

impl<'a, Tag: InstanceTag> Drop for Instance<'a, Tag> {
    fn drop(&mut self) {
        log::trace!("Freeing component {:?}", self.component);
        unsafe { self.binding.fmi2FreeInstance(self.component) };
    }
}

impl<'a, Tag: InstanceTag> FmiInstance for Instance<'a, Tag> {
    type ModelDescription = schema::Fmi2ModelDescription;
    type ValueRef = <Fmi2Import as FmiImport>::ValueRef;

    fn name(&self) -> &str {
        &self.name
    }

    /// The FMI-standard version string
    fn get_version(&self) -> &str {
        Common::get_version(self)
    }

    fn interface_type(&self) -> InterfaceType {
        Tag::TYPE
    }

    fn model_description(&self) -> &Self::ModelDescription {
        self.model_description
    }
}

impl<'a, Tag: InstanceTag> std::fmt::Debug for Instance<'a, Tag> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Instance {} {{Import {}, {:?}}}",
            self.name, self.model_description.model_name, self.component,
        )
    }
}
