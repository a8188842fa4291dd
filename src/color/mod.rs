pub(crate) mod interpolate;
pub(crate) mod value;

pub(crate) use value::Color;
