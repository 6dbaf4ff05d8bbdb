//! CLI command handlers

pub mod commands;

pub use commands::{inspect, load_instructions, process, render, InstructionSource, OutputFormat};
