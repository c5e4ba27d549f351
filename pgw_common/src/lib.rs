mod helpers;
mod minor_units;

pub mod op;

pub use helpers::parse_boolean_flag;
pub use minor_units::{MinorUnits, MinorUnitsConversionError};
