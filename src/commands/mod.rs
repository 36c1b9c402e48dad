pub mod collect;
pub mod migrate;
pub mod query;
pub mod status;
