/// Storage layer for poll observations
///
/// Poll tasks only see the `Recorder` trait; the PostgreSQL implementation
/// owns the connection pool and the validated results table name.

pub mod identifier;
pub mod migrations;
pub mod repository;

pub use identifier::{TableName, TableNameError};
pub use repository::{PgRecorder, Recorder};
