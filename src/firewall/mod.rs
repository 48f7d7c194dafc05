pub mod rules;
pub mod validate;
pub mod watcher;

pub use rules::{FirewallRule, FirewallRuleSet, Protocol};
pub use watcher::{AccessLogWatcher, DeniedSite};
