pub mod backup;
pub mod bootloader;
pub mod firewall;
pub mod install;
pub mod password;
pub mod properties;

pub use backup::BackupTask;
pub use bootloader::BootloaderTask;
pub use firewall::FirewallTask;
pub use install::InstallTask;
pub use password::PasswordTask;
pub use properties::PropertiesTask;
