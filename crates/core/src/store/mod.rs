//! Per-city marker sets.
//!
//! Selecting a city clears the current set right away and hands out a
//! [`LoadTicket`]. Only the completion carrying the newest ticket is applied, so
//! a slow response for a previously selected city can never overwrite the
//! current one.

pub mod fetch;
pub mod index;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::{QuizError, Result},
    identifiers::{CityIdentifier, MarkerIdentifier},
    quiz::marker::{Marker, MarkerRecord},
    radar::RadarZone,
    store::index::MarkerIndex,
};

/// Where a city's marker list lives. Strings starting with `http://` or
/// `https://` are URLs; anything else is a local path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl From<String> for DataSource {
    fn from(s: String) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            DataSource::Url(s)
        } else {
            DataSource::Path(PathBuf::from(s))
        }
    }
}

impl From<DataSource> for String {
    fn from(source: DataSource) -> Self {
        source.to_string()
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CitySource {
    pub id: CityIdentifier,
    pub name: String,
    pub source: DataSource,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadTicket {
    pub generation: u64,
    pub city: CityIdentifier,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The markers replaced the current set.
    Applied { markers: usize },
    /// A newer selection was made after this ticket was issued.
    Stale,
    Failed,
}

/// Parse a city file. The file must be a JSON array; entries that are not
/// usable marker records (missing title or coordinates) are skipped.
pub fn parse_marker_records(bytes: &[u8]) -> Result<Vec<MarkerRecord>> {
    let entries: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(entry = i, %error, "skipping unreadable marker record");
                None
            }
        })
        .collect())
}

pub struct MarkerStore {
    catalog: Vec<CitySource>,
    generation: u64,
    city: Option<CityIdentifier>,
    markers: Vec<Marker>,
    slots: HashMap<MarkerIdentifier, usize>,
    index: MarkerIndex,
}

impl MarkerStore {
    pub fn new(catalog: Vec<CitySource>) -> Self {
        Self {
            catalog,
            generation: 0,
            city: None,
            markers: Vec::new(),
            slots: HashMap::new(),
            index: MarkerIndex::default(),
        }
    }

    pub fn catalog(&self) -> &[CitySource] {
        &self.catalog
    }

    pub fn city_source(&self, city: &CityIdentifier) -> Option<&CitySource> {
        self.catalog.iter().find(|c| &c.id == city)
    }

    pub fn current_city(&self) -> Option<&CityIdentifier> {
        self.city.as_ref()
    }

    /// Switch to `city`, dropping every marker of the previous selection.
    /// Unknown cities are rejected and leave the store untouched.
    pub fn select(&mut self, city: &CityIdentifier) -> Result<(LoadTicket, DataSource)> {
        let source = self
            .city_source(city)
            .map(|c| c.source.clone())
            .ok_or_else(|| QuizError::UnknownCity(city.clone()))?;

        self.generation += 1;
        self.city = Some(city.clone());
        self.clear();

        info!(%city, generation = self.generation, %source, "city selected");

        Ok((
            LoadTicket {
                generation: self.generation,
                city: city.clone(),
            },
            source,
        ))
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation && self.city.as_ref() == Some(&ticket.city)
    }

    pub fn complete(
        &mut self,
        ticket: &LoadTicket,
        records: std::result::Result<Vec<MarkerRecord>, String>,
    ) -> LoadOutcome {
        if !self.is_current(ticket) {
            debug!(
                city = %ticket.city,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale marker load"
            );
            return LoadOutcome::Stale;
        }

        let records = match records {
            Ok(records) => records,
            Err(error) => {
                warn!(city = %ticket.city, %error, "failed to load markers");
                return LoadOutcome::Failed;
            }
        };

        self.clear();
        self.markers = records
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| Marker::from_record(&ticket.city, i, record))
            .collect();
        self.slots = self
            .markers
            .iter()
            .enumerate()
            .map(|(slot, marker)| (marker.id.clone(), slot))
            .collect();
        self.index = MarkerIndex::build(self.markers.iter().map(|m| m.position));

        info!(
            city = %ticket.city,
            markers = self.markers.len(),
            answerable = self.answerable_count(),
            "markers loaded"
        );

        LoadOutcome::Applied {
            markers: self.markers.len(),
        }
    }

    fn clear(&mut self) {
        self.markers.clear();
        self.slots.clear();
        self.index = MarkerIndex::default();
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn get(&self, id: &MarkerIdentifier) -> Option<&Marker> {
        self.slots.get(id).map(|&slot| &self.markers[slot])
    }

    pub fn get_mut(&mut self, id: &MarkerIdentifier) -> Option<&mut Marker> {
        self.slots.get(id).map(|&slot| &mut self.markers[slot])
    }

    pub fn answerable_count(&self) -> u32 {
        self.markers.iter().filter(|m| m.is_answerable()).count() as u32
    }

    pub fn within(&self, zone: &RadarZone) -> Vec<&Marker> {
        self.index
            .within(zone)
            .into_iter()
            .map(|slot| &self.markers[slot])
            .collect()
    }
}
