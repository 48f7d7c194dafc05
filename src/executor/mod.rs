pub mod runner;

pub use runner::{CommandExecutor, CommandOutput, ExternalCommand, ShellRunner};
