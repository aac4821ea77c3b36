//! Execution tracing for matching runs
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod history;

pub use self::history::{ExecutionHistory, ExecutionMetadata, TracePoint};
