pub mod progress;
pub mod prompt;

pub use progress::CliProgressSink;
pub use prompt::ConfirmPrompt;
