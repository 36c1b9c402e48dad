mod catalog;
mod output;
mod run;
mod table;
#[cfg(test)]
mod tests;

pub(crate) use output::write_text_table;
pub use run::run;
pub(crate) use table::preview_table;

use catalog::*;
use output::*;
#[cfg(test)]
use table::*;
