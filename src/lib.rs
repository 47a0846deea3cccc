pub mod dlq;
pub mod domain;
pub mod engine;
pub mod ingestion;
pub mod statement;
