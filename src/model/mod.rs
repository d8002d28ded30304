pub mod action;
pub mod requirement;
