pub mod discord_platform;
pub mod economy_ledger;
pub mod ranking_client;
pub mod scheduler;

pub use discord_platform::*;
pub use economy_ledger::*;
pub use ranking_client::*;
pub use scheduler::*;
