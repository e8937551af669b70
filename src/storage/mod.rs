mod codec;
mod store;
mod table;

pub use codec::*;
pub use store::*;
pub use table::*;
