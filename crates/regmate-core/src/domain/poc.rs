use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A Point of Contact registration record.
///
/// `handle` is assigned by the registry; a record built locally for
/// creation carries `None` until the service answers with one. Absent
/// fields stay `None` so that an omitted element and an empty one remain
/// distinguishable across round-trips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poc {
    pub handle: Option<String>,
    pub kind: PocKind,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub street_address: Vec<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub emails: Vec<String>,
    pub phones: BTreeMap<String, Phone>,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub number: String,
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PocKind {
    #[default]
    Person,
    Role,
}

impl PocKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PocKind::Person => "PERSON",
            PocKind::Role => "ROLE",
        }
    }
}

impl fmt::Display for PocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PocKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PERSON" => Ok(PocKind::Person),
            "ROLE" => Ok(PocKind::Role),
            other => Err(CoreError::InvalidPocKind(other.to_string())),
        }
    }
}

impl Serialize for PocKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PocKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl Poc {
    /// Checks the registry's submission invariant: a mailing address plus
    /// at least one contact method. A draft that only carries an address
    /// is fine to hold locally, so this runs before submission rather
    /// than inside the codecs.
    pub fn validate_for_submit(&self) -> Result<(), CoreError> {
        let has_street = self
            .street_address
            .iter()
            .any(|line| !line.trim().is_empty());
        if !has_street || self.city.is_none() {
            return Err(CoreError::MissingAddress);
        }

        if self.emails.is_empty() && self.phones.is_empty() {
            return Err(CoreError::MissingContactMethod);
        }

        Ok(())
    }
}
