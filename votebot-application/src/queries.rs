pub mod alias_queries;
pub mod announcement_queries;
pub mod ranking_queries;
pub mod status_queries;
