pub mod parser;
pub mod patterns;
