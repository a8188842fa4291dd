pub(crate) mod background;
pub(crate) mod parallax;
pub(crate) mod region;
pub(crate) mod signal;
pub(crate) mod to_top;
