//! Library half of the `pcodes` binary: logging setup and the batch stages.

pub mod logging;
pub mod pipeline;
pub mod types;
