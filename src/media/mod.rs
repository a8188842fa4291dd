pub(crate) mod hover;
pub(crate) mod manifest;
pub(crate) mod platform;
pub(crate) mod player;
pub(crate) mod source;
pub(crate) mod thumbnail;
