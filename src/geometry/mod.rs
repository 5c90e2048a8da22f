pub(crate) mod format;
pub(crate) mod stride;
pub(crate) mod table;
