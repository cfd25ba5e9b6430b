pub mod core;
pub mod endpoint;
pub mod probe;
pub mod storage;
pub mod utils;

// re‑export ergonomic entry points
pub use crate::core::config::RegistryConfig;
pub use crate::core::errors::{NavigationError, RegistryError, StoreError, UrlError};
pub use crate::core::navigation::{LogNavigator, Navigator};
pub use crate::core::registry::Registry;
pub use probe::{HttpProbeClient, ProbeClient, Prober, ReachabilityVerdict};
pub use storage::{ConnectionProfile, FileProfileStore, MemoryProfileStore, ProfileStore};
