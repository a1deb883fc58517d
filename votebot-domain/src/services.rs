// Domain services: pure logic, no I/O
pub mod composition;
pub mod member_matcher;
pub mod normalizer;
pub mod ranking_parser;
pub mod reward_delivery;

pub use composition::*;
pub use member_matcher::*;
pub use normalizer::*;
pub use ranking_parser::*;
pub use reward_delivery::*;
