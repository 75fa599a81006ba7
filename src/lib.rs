pub mod categorizer;
pub mod cli;
pub mod db;
pub mod error;
pub mod fmt;
pub mod importer;
pub mod lookup;
pub mod models;
pub mod qif;
pub mod reviewer;
pub mod settings;
