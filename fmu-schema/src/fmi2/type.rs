#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "Real")]
pub struct RealType {
    #[xml(attr = "quantity")]
    pub quantity: Option<String>,
    #[xml(attr = "unit")]
    pub unit: Option<String>,
    #[xml(attr = "displayUnit")]
    pub display_unit: Option<String>,
    #[xml(default, attr = "relativeQuantity")]
    pub relative_quantity: bool,
    #[xml(attr = "min")]
    pub min: Option<f64>,
    #[xml(attr = "max")]
    pub max: Option<f64>,
    #[xml(attr = "nominal")]
    pub nominal: Option<f64>,
    #[xml(default, attr = "unbounded")]
    pub unbounded: bool,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "Integer")]
pub struct IntegerType {
    #[xml(attr = "quantity")]
    pub quantity: Option<String>,
    #[xml(attr = "min")]
    pub min: Option<i32>,
    #[xml(attr = "max")]
    pub max: Option<i32>,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "Boolean")]
pub struct BooleanType {}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "String")]
pub struct StringType {}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "Item")]
pub struct EnumerationItem {
    #[xml(attr = "name")]
    pub name: String,
    #[xml(attr = "value")]
    pub value: i32,
    #[xml(attr = "description")]
    pub description: Option<String>,
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "Enumeration")]
pub struct EnumerationType {
    #[xml(attr = "quantity")]
    pub quantity: Option<String>,
    #[xml(child = "Item")]
    pub items: Vec<EnumerationItem>,
}

#[derive(Clone, Debug, PartialEq, hard_xml::XmlRead)]
pub enum SimpleTypeElement {
    #[xml(tag = "Real")]
    Real(RealType),
    #[xml(tag = "Integer")]
    Integer(IntegerType),
    #[xml(tag = "Boolean")]
    Boolean(BooleanType),
    #[xml(tag = "String")]
    String(StringType),
    #[xml(tag = "Enumeration")]
    Enumeration(EnumerationType),
}

impl Default for SimpleTypeElement {
    fn default() -> Self {
        Self::Real(RealType::default())
    }
}

#[derive(Clone, Default, Debug, PartialEq, hard_xml::XmlRead)]
#[xml(tag = "SimpleType")]
/// Type attributes of a scalar variable
pub struct SimpleType {
    /// Name of SimpleType element. "name" must be unique with respect to all other elements of the
    /// TypeDefinitions list. Furthermore, "name" of a SimpleType must be different to all
    /// "name"s of ScalarVariable.
    #[xml(attr = "name")]
    pub name: String,

    /// Description of the SimpleType
    #[xml(attr = "description")]
    pub description: Option<String>,

    #[xml(
        child = "Real",
        child = "Integer",
        child = "Boolean",
        child = "String",
        child = "Enumeration"
    )]
    pub elem: SimpleTypeElement,
}

impl SimpleType {
    pub fn unit(&self) -> Option<&str> {
        match &self.elem {
            SimpleTypeElement::Real(real) => real.unit.as_deref(),
            _ => None,
        }
    }
}
