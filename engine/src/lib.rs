pub mod config;
pub mod error;
pub mod games;
pub mod logger;

pub use error::{EngineError, EngineResult, IllegalMoveReason};
