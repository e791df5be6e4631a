pub mod config;
pub mod logging;

pub mod compare;
pub mod driver;
pub mod fetch;
pub mod llm;
pub mod orchestrator;
pub mod prompt;
pub mod report;
pub mod sources;
