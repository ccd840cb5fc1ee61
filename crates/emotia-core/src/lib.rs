//! Emotia Core Library
//!
//! Domain models, error types, configuration, validation and collaborator
//! interfaces shared by every Emotia crate.

pub mod config;
pub mod error;
pub mod hooks;
pub mod models;
pub mod storage_types;
pub mod validation;

pub use config::{BaseConfig, Config, PipelineConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use hooks::{AuditSink, Authorizer, EventSink, NoOpEventSink, TracingAuditSink};
pub use storage_types::StorageBackend;
