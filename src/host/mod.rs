//! Host-facing command contract and the stdio bridge that serves it.

pub mod channel;
pub mod contract;
pub mod handler;
pub mod stdio;
pub mod tools;
