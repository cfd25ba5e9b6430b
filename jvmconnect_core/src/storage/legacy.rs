//! Decoding of stored profile documents.
//!
//! Current documents are a JSON array of profiles. Older consoles wrote an
//! object keyed by profile name; that shape is accepted on read only and
//! flattened to its values in document order.

use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::profile::ConnectionProfile;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredProfiles {
    Sequence(Vec<Value>),
    Mapping(Map<String, Value>),
}

/// Result of reading a stored document record by record.
#[derive(Debug, Default)]
pub struct DecodedProfiles {
    pub profiles: Vec<ConnectionProfile>,
    /// One line per record, or for the whole document, that could not be read.
    pub rejected: Vec<String>,
}

impl DecodedProfiles {
    /// Everything in the document made it into `profiles`.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Reads every record it can; unreadable ones are listed in `rejected`.
///
/// Absent, blank and `null` documents are complete and empty.
pub fn decode_document(raw: Option<&str>) -> DecodedProfiles {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return DecodedProfiles::default();
    };

    let entries: Vec<(String, Value)> = match serde_json::from_str::<Option<StoredProfiles>>(raw) {
        Ok(None) => return DecodedProfiles::default(),
        Ok(Some(StoredProfiles::Sequence(values))) => values
            .into_iter()
            .enumerate()
            .map(|(i, value)| (format!("#{i}"), value))
            .collect(),
        Ok(Some(StoredProfiles::Mapping(map))) => map.into_iter().collect(),
        Err(e) => {
            return DecodedProfiles {
                profiles: Vec::new(),
                rejected: vec![format!("not a list or map of profiles: {e}")],
            }
        }
    };

    let mut decoded = DecodedProfiles::default();
    for (entry, value) in entries {
        match serde_json::from_value::<ConnectionProfile>(value) {
            Ok(profile) => decoded.profiles.push(profile),
            Err(e) => decoded.rejected.push(format!("entry {entry}: {e}")),
        }
    }
    decoded
}

/// Turns a stored document into a profile list.
///
/// Never fails: unreadable records are skipped with a warning, and absent,
/// blank, or unrecognisable documents yield an empty list.
pub fn decode_profiles(raw: Option<&str>) -> Vec<ConnectionProfile> {
    let decoded = decode_document(raw);
    for problem in &decoded.rejected {
        warn!("Stored connections: skipping {problem}");
    }
    decoded.profiles
}

/// Parses a user-supplied profile document in either stored shape.
///
/// Unlike [`decode_profiles`], any unreadable record is an error.
pub fn parse_profiles(raw: &str) -> Result<Vec<ConnectionProfile>, serde_json::Error> {
    match serde_json::from_str::<StoredProfiles>(raw)? {
        StoredProfiles::Sequence(values) => values.into_iter().map(serde_json::from_value).collect(),
        StoredProfiles::Mapping(map) => map.into_values().map(serde_json::from_value).collect(),
    }
}
