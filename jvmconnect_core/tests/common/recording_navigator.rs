use std::sync::{Arc, Mutex};

use jvmconnect_core::{NavigationError, Navigator};
use url::Url;

/// Remembers every URL it was asked to open.
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    pub opened: Arc<Mutex<Vec<Url>>>,
}

impl RecordingNavigator {
    pub fn opened(&self) -> Vec<Url> {
        self.opened.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn open(&self, url: &Url) -> Result<(), NavigationError> {
        self.opened.lock().unwrap().push(url.clone());
        Ok(())
    }
}
