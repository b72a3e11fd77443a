pub mod catalog;
pub mod ingest;
pub mod resolver;
