pub mod query;
pub mod reduce;
