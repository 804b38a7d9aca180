#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod memory;

pub use memory::{MemoryStore, MemoryTransaction};
