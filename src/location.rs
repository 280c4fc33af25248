//! Cascading location selection over a pincode directory.
//!
//! The directory is a flat list of pincode records fetched once per form
//! session; every transition here is a pure function over that snapshot.
//! Lookup misses are normal "no selection" outcomes, never errors: input
//! arrives incrementally while the user types or picks from a dropdown.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubArea {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sub_areas: Vec<SubArea>,
}

/// One entry of the pincode directory. `code` is unique across the
/// directory; area names are unique within a record, sub-area names
/// unique within an area.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PincodeRecord {
    pub code: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub areas: Vec<Area>,
}

/// Dependent-dropdown selection state. Empty string means "no selection".
///
/// `city` and `state` are always derived from the record matching
/// `pincode`, never set independently. Changing the pincode resets area
/// and sub-area; changing the area resets the sub-area only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub area: String,
    pub sub_area: String,
}

impl SelectionState {
    /// Select a pincode. A matched code derives `city`/`state` from the
    /// directory; an unmatched or cleared code leaves every derived field
    /// empty. Either way the area and sub-area are reset.
    #[must_use]
    pub fn with_pincode(&self, records: &[PincodeRecord], code: &str) -> Self {
        match find_record(records, code) {
            Some(record) => Self {
                pincode: code.to_string(),
                city: record.city.clone(),
                state: record.state.clone(),
                area: String::new(),
                sub_area: String::new(),
            },
            None => Self {
                pincode: code.to_string(),
                ..Self::default()
            },
        }
    }

    /// Select an area by name, resetting the sub-area. The name is stored
    /// even when it does not belong to the current record: the UI only
    /// offers valid names, and a stale one degrades to an empty sub-area
    /// dropdown via [`available_sub_areas`] instead of failing.
    #[must_use]
    pub fn with_area(&self, name: &str) -> Self {
        Self {
            area: name.to_string(),
            sub_area: String::new(),
            ..self.clone()
        }
    }

    /// Select a sub-area verbatim. No downstream resets.
    #[must_use]
    pub fn with_sub_area(&self, name: &str) -> Self {
        Self {
            sub_area: name.to_string(),
            ..self.clone()
        }
    }
}

// Exact string equality: codes carry leading structure and are never
// numerically coerced.
fn find_record<'a>(records: &'a [PincodeRecord], code: &str) -> Option<&'a PincodeRecord> {
    records.iter().find(|r| r.code == code)
}

fn find_area<'a>(record: &'a PincodeRecord, name: &str) -> Option<&'a Area> {
    record.areas.iter().find(|a| a.name == name)
}

/// Areas offered for `pincode`, sorted case-insensitively ascending by
/// name. The ordering is a hard contract: dropdown content must be
/// deterministic regardless of directory order. Empty when the pincode is
/// unset or unmatched.
#[must_use]
pub fn available_areas<'a>(records: &'a [PincodeRecord], pincode: &str) -> Vec<&'a Area> {
    if pincode.is_empty() {
        return Vec::new();
    }
    let mut areas: Vec<&Area> = find_record(records, pincode)
        .map(|r| r.areas.iter().collect())
        .unwrap_or_default();
    areas.sort_by_key(|a| a.name.to_lowercase());
    areas
}

/// Sub-areas offered for the selected area, same sort rule as
/// [`available_areas`]. Empty when the pincode or area is not matched.
#[must_use]
pub fn available_sub_areas<'a>(
    records: &'a [PincodeRecord],
    pincode: &str,
    area: &str,
) -> Vec<&'a SubArea> {
    if pincode.is_empty() {
        return Vec::new();
    }
    let mut sub_areas: Vec<&SubArea> = find_record(records, pincode)
        .and_then(|r| find_area(r, area))
        .map(|a| a.sub_areas.iter().collect())
        .unwrap_or_default();
    sub_areas.sort_by_key(|s| s.name.to_lowercase());
    sub_areas
}
