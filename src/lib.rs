pub mod cli;
pub mod error;
pub mod generate;
pub mod model;
pub mod naming;
pub mod pipeline;
pub mod recording;
pub mod report;
pub mod ticket;
pub mod trace;
