//! Command modules for the InfraForge CLI

pub mod audit;
pub mod chains;
pub mod serve;

pub use audit::audit_file;
pub use chains::list_chains;
pub use serve::run_server;
