//! Runtime module: process lifecycle: logging, config, one parse, report.

pub mod boot;
pub mod cli;
