//! CLI command implementations.

mod config;
mod export;
mod index;
mod init;
mod knn;
mod search;
mod upload;

pub use config::run_config;
pub use export::run_export;
pub use index::run_index;
pub use init::run_init;
pub use knn::run_knn;
pub use search::run_search;
pub use upload::run_upload;
