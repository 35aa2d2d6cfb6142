pub mod error;
pub mod file;
pub mod pool;
pub mod progress;
