pub mod listing;
pub mod record;

pub use listing::*;
pub use record::*;
