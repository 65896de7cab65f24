// Library exports for the connect-five engine
// The binaries and integration tests use the core engine through these modules

pub mod board;
pub mod cancel;
pub mod config;
pub mod error;
pub mod estimator;
pub mod eval;
pub mod search;
pub mod service;
pub mod state;
pub mod strategy;
pub mod types;
