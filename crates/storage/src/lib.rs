#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod json;
pub mod memory;

pub use memory::InMemory;
