//! Tracked-object records, snapshot loading and filtering

mod loader;
mod search;
mod space_object;

pub use loader::*;
pub use search::*;
pub use space_object::*;
