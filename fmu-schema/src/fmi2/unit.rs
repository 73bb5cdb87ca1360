#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "Unit")]
/// Unit definition (with respect to SI base units) and default display units
pub struct Fmi2Unit {
    #[xml(attr = "name")]
    pub name: String,
    /// BaseUnit_value = factor*Unit_value + offset
    #[xml(child = "BaseUnit")]
    pub base_unit: Option<BaseUnit>,
    #[xml(child = "DisplayUnit")]
    pub display_unit: Vec<DisplayUnit>,
}

impl Fmi2Unit {
    pub fn display_unit_by_name(&self, name: &str) -> Option<&DisplayUnit> {
        self.display_unit.iter().find(|du| du.name == name)
    }
}

#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "BaseUnit")]
pub struct BaseUnit {
    /// Exponent of SI base unit "kg"
    #[xml(attr = "kg")]
    pub kg: Option<i32>,
    /// Exponent of SI base unit "m"
    #[xml(attr = "m")]
    pub m: Option<i32>,
    #[xml(attr = "s")]
    pub s: Option<i32>,
    #[xml(attr = "A")]
    pub a: Option<i32>,
    #[xml(attr = "K")]
    pub k: Option<i32>,
    #[xml(attr = "mol")]
    pub mol: Option<i32>,
    #[xml(attr = "cd")]
    pub cd: Option<i32>,
    #[xml(attr = "rad")]
    pub rad: Option<i32>,
    #[xml(attr = "factor")]
    pub factor: Option<f64>,
    #[xml(attr = "offset")]
    pub offset: Option<f64>,
}

/// `display_unit = factor * unit + offset`
#[derive(Clone, Default, PartialEq, Debug, hard_xml::XmlRead)]
#[xml(tag = "DisplayUnit")]
pub struct DisplayUnit {
    #[xml(attr = "name")]
    pub name: String,
    #[xml(attr = "factor")]
    pub factor: Option<f64>,
    #[xml(attr = "offset")]
    pub offset: Option<f64>,
}

impl DisplayUnit {
    /// Convert a value given in this display unit back into the unit it is defined on.
    pub fn to_unit(&self, display_value: f64) -> f64 {
        (display_value - self.offset.unwrap_or(0.0)) / self.factor.unwrap_or(1.0)
    }

    /// Convert a value in the defining unit into this display unit.
    pub fn from_unit(&self, value: f64) -> f64 {
        self.factor.unwrap_or(1.0) * value + self.offset.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use hard_xml::XmlRead;

    use super::*;

    #[test]
    fn test_base_unit() {
        let xml = r#"
        <Unit name="m/s2"><BaseUnit m="1" s="-2"/></Unit>
        "#;

        let unit: Fmi2Unit = Fmi2Unit::from_str(xml).unwrap();
        assert_eq!(unit.name, "m/s2");
        assert_eq!(
            unit.base_unit,
            Some(BaseUnit {
                m: Some(1),
                s: Some(-2),
                ..Default::default()
            })
        )
    }

    #[test]
    fn test_display_unit() {
        let xml = r#"
        <Unit name="K">
            <BaseUnit K="1"/>
            <DisplayUnit name="degC" offset="-273.15"/>
            <DisplayUnit name="mK" factor="1000"/>
        </Unit>"#;

        let unit = Fmi2Unit::from_str(xml).unwrap();
        assert_eq!(unit.display_unit.len(), 2);

        let deg_c = unit.display_unit_by_name("degC").unwrap();
        assert_approx_eq!(f64, deg_c.to_unit(26.85), 300.0, epsilon = 1e-9);
        assert_approx_eq!(f64, deg_c.from_unit(300.0), 26.85, epsilon = 1e-9);

        let mk = unit.display_unit_by_name("mK").unwrap();
        assert_approx_eq!(f64, mk.to_unit(1500.0), 1.5);
        assert!(unit.display_unit_by_name("degF").is_none());
    }
}
