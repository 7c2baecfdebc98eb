// File: ./src/model/item.rs
// Timetable tree and the slot/class records stored at its leaves
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Top-level metadata entry, never a program.
pub const UPDATE_KEY: &str = "Update";
/// Section bucket whose entries apply to every section of a batch year.
pub const NULL_KEY: &str = "null";
/// Key under a section holding named subsections.
pub const SUBSECTIONS_KEY: &str = "Subsections";

/// The whole published timetable.
///
/// Kept as a JSON object tree (with source key order) because every level
/// below the root is keyed by data: programs, departments, batch years,
/// sections and day names. All lookups are total: a missing or mistyped
/// node reads as "nothing here".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timetable {
    root: Map<String, Value>,
}

impl Timetable {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let root: Map<String, Value> = serde_json::from_str(text)?;
        Ok(Self { root })
    }

    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        let root: Map<String, Value> = serde_json::from_slice(bytes)?;
        Ok(Self { root })
    }

    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(root) => Some(Self { root }),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Raw `Update.local_time_pkt` string, if present.
    pub fn update_stamp(&self) -> Option<&str> {
        self.root
            .get(UPDATE_KEY)?
            .get("local_time_pkt")?
            .as_str()
    }

    /// Keys of every object reached by walking `path` from the root, in
    /// source order with duplicates dropped. Non-object or missing nodes
    /// yield an empty list.
    pub fn child_keys(&self, path: &[&str]) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for node in self.nodes(path) {
            for key in node.keys() {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
        keys
    }

    /// All objects matching `path`. A segment can match more than one key
    /// (`"EE"` matches both `"CS/EE"` and `"EE/AI"`), so a path fans out.
    pub fn nodes(&self, path: &[&str]) -> Vec<&Map<String, Value>> {
        let mut current = vec![&self.root];
        for segment in path {
            current = current
                .into_iter()
                .flat_map(|map| lookup(map, segment))
                .filter_map(Value::as_object)
                .collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }

    /// Slots listed under `day` in the objects at `path`, concatenated in
    /// key order.
    pub fn day_slots(&self, path: &[&str], day: &str) -> Vec<Slot> {
        self.nodes(path)
            .into_iter()
            .flat_map(|node| slots_of(node, day))
            .collect()
    }
}

/// Every entry `key` selects, in source order: the key itself, any key
/// split on `/` with `key` among its parts (options are offered split), and
/// for `null` the shared bucket in any case.
fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> impl Iterator<Item = &'a Value> {
    let shared = key.eq_ignore_ascii_case(NULL_KEY);
    map.iter()
        .filter(move |(k, _)| {
            k.as_str() == key
                || (shared && k.eq_ignore_ascii_case(NULL_KEY))
                || (k.contains('/') && k.split('/').any(|part| part.trim() == key))
        })
        .map(|(_, v)| v)
}

/// Parses the slot array under `day`, skipping malformed entries.
pub(crate) fn slots_of(node: &Map<String, Value>, day: &str) -> Vec<Slot> {
    let Some(Value::Array(items)) = node.get(day) else {
        return vec![];
    };
    items
        .iter()
        .filter_map(|item| match Slot::deserialize(item) {
            Ok(slot) => Some(slot),
            Err(e) => {
                log::warn!("Skipping malformed slot on {}: {}", day, e);
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    #[serde(deserialize_with = "sort_value")]
    pub value: f64,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "AM_PM", default)]
    pub am_pm: String,
}

impl TimePoint {
    pub fn label(&self) -> String {
        if self.am_pm.is_empty() {
            self.text.clone()
        } else {
            format!("{} {}", self.text, self.am_pm)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: TimePoint,
    pub end: TimePoint,
}

/// A class text field as published. An absent field, an explicit `null`
/// and an empty string are three different values for duplicate detection;
/// all of them display as empty text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Field {
    #[default]
    Missing,
    Null,
    Text(String),
}

impl Field {
    pub fn as_str(&self) -> &str {
        match self {
            Field::Text(s) => s,
            Field::Missing | Field::Null => "",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for Field {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Field::Text(s) if s == other)
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Text(s.to_string())
    }
}

// Only reached when the key is present; `#[serde(default)]` covers absence.
impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<String>::deserialize(deserializer)? {
            Some(s) => Field::Text(s),
            None => Field::Null,
        })
    }
}

impl Serialize for Field {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Field::Text(s) => serializer.serialize_str(s),
            Field::Missing | Field::Null => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassEntry {
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub name: Field,
    #[serde(default, skip_serializing_if = "Field::is_missing")]
    pub location: Field,
    #[serde(rename = "type", default, skip_serializing_if = "Field::is_missing")]
    pub kind: Field,
    #[serde(default, deserialize_with = "nullable")]
    pub info: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub time: TimeRange,
    #[serde(default, deserialize_with = "nullable")]
    pub classes: Vec<ClassEntry>,
}

impl Slot {
    pub fn start_value(&self) -> f64 {
        self.time.start.value
    }

    pub fn end_value(&self) -> f64 {
        self.time.end.value
    }

    /// `"10:00 AM - 11:00 AM"`
    pub fn time_label(&self) -> String {
        format!("{} - {}", self.time.start.label(), self.time.end.label())
    }
}

// Sort values are numbers in practice, but numeric strings turn up too.
fn sort_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid time value '{}'", s))),
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slot_tolerates_missing_and_null_fields() {
        let slot: Slot = serde_json::from_value(json!({
            "time": {
                "start": { "value": "930", "text": "9:30", "AM_PM": "AM" },
                "end": { "value": 1045, "text": "10:45" }
            },
            "classes": [{ "name": "Calculus", "location": null, "info": null }]
        }))
        .unwrap();
        assert_eq!(slot.start_value(), 930.0);
        assert_eq!(slot.time_label(), "9:30 AM - 10:45");
        assert_eq!(slot.classes[0].location, Field::Null);
        assert_eq!(slot.classes[0].kind, Field::Missing);
        assert_eq!(slot.classes[0].name, "Calculus");
        assert!(slot.classes[0].location.is_empty());
        assert!(slot.classes[0].info.is_empty());
    }

    #[test]
    fn combined_keys_are_reachable_by_part() {
        let tt = Timetable::from_value(json!({
            "BS": { "CS/SE": { "2023": {} }, "SE/AI": { "2024": {}, "2023": {} } }
        }))
        .unwrap();
        assert_eq!(tt.child_keys(&["BS", "CS"]), vec!["2023".to_string()]);
        assert_eq!(
            tt.child_keys(&["BS", "SE"]),
            vec!["2023".to_string(), "2024".to_string()]
        );
        assert_eq!(tt.nodes(&["BS", "SE"]).len(), 2);
        assert!(tt.child_keys(&["BS", "EE"]).is_empty());
    }

    #[test]
    fn malformed_slots_are_skipped() {
        let tt = Timetable::from_value(json!({
            "P": { "Monday": [
                { "time": "broken" },
                { "time": { "start": { "value": 8 }, "end": { "value": 9 } } }
            ] }
        }))
        .unwrap();
        let slots = tt.day_slots(&["P"], "Monday");
        assert_eq!(slots.len(), 1);
        assert!(slots[0].classes.is_empty());
    }
}
