use log::info;
use url::Url;

use super::errors::NavigationError;

/// Opens a console view in a new window/tab.
pub trait Navigator: Send + Sync {
    fn open(&self, url: &Url) -> Result<(), NavigationError>;
}

/// Only records where it would have navigated.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn open(&self, url: &Url) -> Result<(), NavigationError> {
        info!("Open {}", url);
        Ok(())
    }
}
