pub mod batch;
pub mod catalog;

pub use batch::{is_installed, InstallBatch};
pub use catalog::{find_group, FeatureGroup, Selection, FEATURE_GROUPS};
