pub mod duckdb;

pub use self::duckdb::{DuckDbReader, SourceFormat};
