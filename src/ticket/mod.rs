pub mod jira;
pub mod sample_values;
pub mod story;
pub mod synthesizer;
