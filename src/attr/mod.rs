pub(crate) mod schema;
pub(crate) mod store;
pub(crate) mod value;
