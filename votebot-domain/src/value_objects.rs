// Domain value objects
pub mod identifiers;
pub mod period;
pub mod resolution;

pub use identifiers::*;
pub use period::*;
pub use resolution::*;
