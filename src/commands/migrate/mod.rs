mod db_setup;
mod load;
mod run;

pub use run::run;
#[cfg(test)]
pub(crate) use db_setup::ensure_schema;
pub(crate) use db_setup::{StoreTable, open_store, table_counts};

use load::*;
