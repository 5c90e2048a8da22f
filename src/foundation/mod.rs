pub(crate) mod debug;
pub(crate) mod error;
pub(crate) mod math;
