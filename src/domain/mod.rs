mod expense;
mod invoice;
mod money;
mod record;

pub use expense::*;
pub use invoice::*;
pub use money::*;
pub use record::*;
