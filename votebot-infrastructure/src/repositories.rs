pub mod clickhouse_meta_store;
pub mod config_files;
pub mod file_meta_store;

pub use clickhouse_meta_store::*;
pub use config_files::*;
pub use file_meta_store::*;
