//! FMI 2.0 schema: `modelDescription.xml` and `buildDescription.xml`.

mod build_description;
mod counts;
mod interface_type;
mod model_description;
mod scalar_variable;
mod r#type;
mod unit;

pub use build_description::*;
pub use interface_type::*;
pub use model_description::*;
pub use r#type::*;
pub use scalar_variable::*;
pub use unit::*;

/// Implements `FromStr` and `Display` for a fieldless enum that appears as an XML attribute.
macro_rules! attr_enum {
    ($ty:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok($ty::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($ty), s)),
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let s = match self {
                    $($ty::$variant => $s,)+
                };
                write!(f, "{}", s)
            }
        }
    };
}

pub(crate) use attr_enum;
