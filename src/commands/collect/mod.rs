mod fetch;
mod output;
mod run;
mod staging;
mod transform;

pub use run::run;
pub(crate) use staging::{discard_staged_batch, load_staged_batch};

use fetch::*;
use output::*;
use staging::*;
use transform::*;
