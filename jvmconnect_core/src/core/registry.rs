use std::collections::HashSet;

use futures::future::join_all;
use log::{debug, error, info};
use url::Url;

use super::config::RegistryConfig;
use super::errors::{RegistryError, UrlError};
use super::navigation::Navigator;
use crate::endpoint;
use crate::probe::{ProbeClient, Prober, ReachabilityVerdict};
use crate::storage::legacy::{decode_document, decode_profiles};
use crate::storage::{ConnectionProfile, ProfileStore};

/// Owns the saved connection list and refreshes reachability across it.
///
/// The list is stored as one document under `config.storage_key`; every
/// write replaces the whole document, so concurrent writers race and the
/// last `save` wins.
pub struct Registry<S, C> {
    config: RegistryConfig,
    store: S,
    prober: Prober<C>,
    navigator: Box<dyn Navigator>,
}

impl<S: ProfileStore, C: ProbeClient> Registry<S, C> {
    pub fn new(config: RegistryConfig, store: S, client: C, navigator: Box<dyn Navigator>) -> Self {
        let prober = Prober::new(client)
            .with_timeout(config.probe_timeout)
            .with_page(config.page_url.clone(), config.route_path.clone());
        Self {
            config,
            store,
            prober,
            navigator,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn prober(&self) -> &Prober<C> {
        &self.prober
    }

    /// Stored profiles, or an empty list if there are none or the document
    /// cannot be read.
    pub fn load(&self) -> Vec<ConnectionProfile> {
        match self.store.get(&self.config.storage_key) {
            Ok(raw) => decode_profiles(raw.as_deref()),
            Err(e) => {
                error!(
                    "Unable to read connections from '{}': {}",
                    self.config.storage_key, e
                );
                Vec::new()
            }
        }
    }

    /// Stored profiles for a read-modify-write.
    ///
    /// Unlike [`load`](Self::load), a store failure or any record that cannot
    /// be decoded is an error, so the caller never saves over data it could
    /// not see.
    fn load_for_update(&self) -> Result<Vec<ConnectionProfile>, RegistryError> {
        let key = &self.config.storage_key;
        let raw = self.store.get(key)?;
        let decoded = decode_document(raw.as_deref());
        match decoded.rejected.first() {
            None => Ok(decoded.profiles),
            Some(problem) => Err(RegistryError::UnreadableConnections {
                key: key.clone(),
                problem: problem.clone(),
            }),
        }
    }

    /// Replaces the stored list. `reachable` is not persisted.
    pub fn save(&self, profiles: &[ConnectionProfile]) -> Result<(), RegistryError> {
        let doc = serde_json::to_string(profiles)?;
        self.store.set(&self.config.storage_key, &doc)?;
        debug!("Saved {} connection(s)", profiles.len());
        Ok(())
    }

    /// Adds profiles whose names are not stored yet and returns the saved list.
    ///
    /// Existing profiles are never replaced; a name repeated inside
    /// `imported` keeps its first occurrence.
    pub fn import(
        &self,
        imported: Vec<ConnectionProfile>,
    ) -> Result<Vec<ConnectionProfile>, RegistryError> {
        let mut profiles = self.load_for_update()?;
        let mut names: HashSet<String> = profiles.iter().map(|p| p.name.clone()).collect();

        let before = profiles.len();
        profiles.extend(imported.into_iter().filter(|p| names.insert(p.name.clone())));

        self.save(&profiles)?;
        info!(
            "Imported {} new connection(s), {} total",
            profiles.len() - before,
            profiles.len()
        );
        Ok(profiles)
    }

    pub fn find(&self, name: &str) -> Option<ConnectionProfile> {
        self.load().into_iter().find(|p| p.name == name)
    }

    /// Like [`find`](Self::find), but a missing name is an error.
    pub fn get(&self, name: &str) -> Result<ConnectionProfile, RegistryError> {
        self.find(name)
            .ok_or_else(|| RegistryError::UnknownConnection(name.to_string()))
    }

    /// Deletes the profile called `name`. `Ok(false)` if it did not exist.
    pub fn remove(&self, name: &str) -> Result<bool, RegistryError> {
        let mut profiles = self.load_for_update()?;
        let before = profiles.len();
        profiles.retain(|p| p.name != name);
        if profiles.len() == before {
            return Ok(false);
        }
        self.save(&profiles)?;
        Ok(true)
    }

    pub async fn probe(&self, profile: &ConnectionProfile) -> ReachabilityVerdict {
        self.prober.probe(profile).await
    }

    pub async fn check_credentials(
        &self,
        profile: &ConnectionProfile,
        username: &str,
        password: &str,
    ) -> bool {
        self.prober
            .check_credentials(profile, username, password)
            .await
    }

    /// Probes `profile` and records the outcome in `profile.reachable`.
    pub async fn update_reachable_flag<'a>(
        &self,
        profile: &'a mut ConnectionProfile,
    ) -> &'a mut ConnectionProfile {
        let verdict = self.prober.probe(profile).await;
        profile.reachable = Some(verdict.ok);
        profile
    }

    /// Probes every profile concurrently and records each outcome on the
    /// profile at the same position.
    ///
    /// Returns once all probes have settled; a slow agent delays the return
    /// by at most the probe timeout.
    pub async fn update_reachable_flags<'a>(
        &self,
        profiles: &'a mut [ConnectionProfile],
    ) -> &'a mut [ConnectionProfile] {
        let verdicts = join_all(profiles.iter().map(|p| self.prober.probe(p))).await;
        for (profile, verdict) in profiles.iter_mut().zip(verdicts) {
            profile.reachable = Some(verdict.ok);
        }
        profiles
    }

    /// Opens a console view for `profile` through the navigator.
    pub fn connect(&self, profile: &ConnectionProfile) -> Result<Url, RegistryError> {
        let page = self.config.page_url.as_ref().ok_or(UrlError::NoPageUrl)?;
        let url = endpoint::connect_url(page, &profile.name);
        info!("Connecting to '{}'", profile.name);
        self.navigator.open(&url)?;
        Ok(url)
    }

    /// Starting values for a new connection, derived from the page URL.
    pub fn default_options(&self) -> ConnectionProfile {
        endpoint::default_options(
            self.config.page_url.as_ref(),
            self.config.route_path.as_deref(),
            &self.config.jolokia_suffix,
        )
    }
}
