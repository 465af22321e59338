//! Application layer behind the command line

pub mod orchestration;

pub use orchestration::Ccs;
