pub mod alias_commands;
pub mod monthly_cycle_commands;
pub mod reward_commands;
