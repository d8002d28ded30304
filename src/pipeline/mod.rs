pub mod runner;
pub mod writer;
