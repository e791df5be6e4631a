//! CLI command handlers, one file per command.

mod completions;
mod init;
mod man;
mod run;

pub use completions::run_completions;
pub use init::run_init;
pub use man::run_man;
pub use run::run_compare;
