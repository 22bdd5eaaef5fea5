// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`spawner`] defines the process-adapter boundary: the
//!   [`ProcessSpawner`]/[`ProcessHandle`] capability traits and the default
//!   [`TokioSpawner`] backend. Tests substitute a fake spawner here instead
//!   of spawning real processes.
//! - `streamer` drains one byte stream line-by-line, emitting incremental
//!   snapshots to the registered observers.
//! - `engine` owns the execution algorithm: resolve tokens, spawn, drain
//!   both streams concurrently, wait for termination, assemble the result.

pub mod spawner;

pub(crate) mod engine;
pub(crate) mod streamer;

pub use spawner::{ByteReader, ByteWriter, ProcessHandle, ProcessSpawner, TokioSpawner};
