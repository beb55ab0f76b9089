use serde::{Deserialize, Serialize};

/// Country value that places an airline under the "American" tab.
pub const US_COUNTRY: &str = "United States";

/// Normalized display data for one airline.
///
/// Every field is optional: the lookup service may omit any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineRecord {
    /// Lookup code that produced this record
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icao: Option<String>,
    #[serde(default)]
    pub iata: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_iso: Option<String>,
    #[serde(default)]
    pub callsign: Option<String>,
}

impl AirlineRecord {
    pub fn is_us(&self) -> bool {
        self.country.as_deref() == Some(US_COUNTRY)
    }

    /// True when the country is known and is not the United States.
    pub fn is_foreign(&self) -> bool {
        matches!(self.country.as_deref(), Some(country) if country != US_COUNTRY)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("N/A")
    }
}

/// Fixed-length, configuration-ordered list of lookup results.
///
/// One slot per configured identifier. A slot is `None` until a lookup for
/// that identifier succeeds. Serializes as a plain JSON array with `null`
/// holes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AirlineList(Vec<Option<AirlineRecord>>);

impl AirlineList {
    /// A list of `len` empty slots.
    pub fn empty(len: usize) -> Self {
        Self(vec![None; len])
    }

    pub fn from_slots(slots: Vec<Option<AirlineRecord>>) -> Self {
        Self(slots)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AirlineRecord> {
        self.0.get(index).and_then(|slot| slot.as_ref())
    }

    pub fn slots(&self) -> &[Option<AirlineRecord>] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&AirlineRecord>> {
        self.0.iter().map(|slot| slot.as_ref())
    }

    /// Number of slots holding a record.
    pub fn loaded_count(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_some()).count()
    }

    /// Combine freshly fetched slots with this list.
    ///
    /// Each fetched record wins; a `None` in `fetched` keeps whatever this
    /// list holds at the same index. The result always has this list's length.
    pub fn merge_fetched(&self, fetched: Vec<Option<AirlineRecord>>) -> Self {
        let mut fetched = fetched.into_iter();
        let slots = self
            .0
            .iter()
            .map(|previous| match fetched.next().flatten() {
                Some(record) => Some(record),
                None => previous.clone(),
            })
            .collect();
        Self(slots)
    }

    /// Truncate or pad with empty slots so the list has exactly `len` slots.
    pub fn resized(mut self, len: usize) -> Self {
        self.0.resize(len, None);
        self
    }
}
