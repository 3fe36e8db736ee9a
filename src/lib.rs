pub mod arith;
pub mod config;
pub mod error;
pub mod history;
pub mod repl;
pub mod root;
pub mod session;
pub mod timestamp;

mod proptests;

pub use error::CalcError;
