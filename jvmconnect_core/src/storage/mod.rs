pub mod legacy;
pub mod profile;
pub mod store;

pub use profile::ConnectionProfile;
pub use store::{FileProfileStore, MemoryProfileStore, ProfileStore};
