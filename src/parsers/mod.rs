pub mod attributes;
pub mod details;
pub mod locality;
pub mod price;

pub use attributes::*;
pub use details::*;
pub use locality::*;
pub use price::*;
