use std::fmt;

pub const CONNECTION_SUCCESSFUL: &str = "Connection successful";
pub const HOST_NOT_WHITELISTED: &str = "Host not whitelisted";
pub const CONNECTION_FAILED: &str = "Connection failed";

/// Classified outcome of one probe.
///
/// `ok` means "usable connection", which includes agents that answered
/// 401/403 because they exist but want credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachabilityVerdict {
    pub ok: bool,
    pub message: &'static str,
}

impl ReachabilityVerdict {
    pub const fn successful() -> Self {
        Self {
            ok: true,
            message: CONNECTION_SUCCESSFUL,
        }
    }

    pub const fn host_not_whitelisted() -> Self {
        Self {
            ok: false,
            message: HOST_NOT_WHITELISTED,
        }
    }

    pub const fn failed() -> Self {
        Self {
            ok: false,
            message: CONNECTION_FAILED,
        }
    }
}

impl fmt::Display for ReachabilityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}
