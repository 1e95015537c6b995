pub mod args;
pub mod commands;
pub mod engine;
mod error;
pub mod model;
pub mod seed;
pub mod store;
#[cfg(test)]
mod test;

pub use error::Error;
pub use error::Result;
