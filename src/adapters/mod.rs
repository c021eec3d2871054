//! Adapters - implementations of the ports against real services and
//! in-memory test doubles.

pub mod ai;
pub mod memory;
pub mod postgres;
pub mod translation;
