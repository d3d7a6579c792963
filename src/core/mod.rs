//! Core orchestration logic

pub mod queue;
