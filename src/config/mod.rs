pub mod profile;
pub mod properties;

pub use profile::Profile;
pub use properties::PropertiesStore;
