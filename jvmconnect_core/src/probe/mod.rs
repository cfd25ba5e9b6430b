pub mod client;
pub mod http;
pub mod prober;
pub mod verdict;

pub use client::{Credentials, ProbeClient, ProbeFailure, ProbeRequest, ProbeResponse};
pub use http::HttpProbeClient;
pub use prober::Prober;
pub use verdict::ReachabilityVerdict;
