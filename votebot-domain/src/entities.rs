// Domain entities
pub mod alias;
pub mod announcement;
pub mod config;
pub mod member;
pub mod message;
pub mod meta;
pub mod ranking;
pub mod reward;

pub use alias::*;
pub use announcement::*;
pub use config::*;
pub use member::*;
pub use message::*;
pub use meta::*;
pub use ranking::*;
pub use reward::*;
