pub mod geo;
pub mod numeric;
mod ordered_set;

pub use geo::*;
pub use numeric::*;
pub use ordered_set::*;
