pub mod config;
pub mod importer;
