//! Core orchestration: configuration, document kinds, scratch storage and the
//! extraction pipeline.
pub mod config;
pub mod kind;
pub mod pipeline;
pub mod scratch;
