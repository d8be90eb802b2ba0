pub mod cleaner;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod paths;
pub mod store;
pub mod table;
