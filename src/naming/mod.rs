pub mod case;
pub mod resolver;
