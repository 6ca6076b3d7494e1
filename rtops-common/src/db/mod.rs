//! Database access layer

pub mod init;
pub mod settings;

pub use init::init_database;
