use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Result payload posted to `/save`.
///
/// Only `m` is consumed (it goes into the file name); the other fields are
/// decoded so that a value of the wrong type is rejected, then dropped. The
/// bytes written to disk are always the raw request body, never a
/// re-serialization of this struct.
///
/// Decoding is lenient about shape:
/// - a top-level `null` is an empty request (`m = 0`)
/// - keys match field names case-insensitively (`"M"` fills `m`)
/// - a repeated key overwrites the earlier value, in document order
/// - `null` leaves `m` and the string fields untouched, and clears the
///   optional ones
/// - unknown keys are skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveRequest {
    /// Caller supplied timestamp, format not checked
    pub timestamp: String,
    /// Problem size, used for the derived file name
    pub m: i64,
    /// Arbitrary solver output
    pub full_solution_response: Value,
    /// Solver status string
    pub status: String,
    pub best_known_min_score: Option<i64>,
    pub best_bound: Option<f64>,
    pub vars_found: Option<Value>,
}

/// Body returned on a successful save: `{"status":true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub status: bool,
}

impl SaveResponse {
    pub fn saved() -> Self {
        Self { status: true }
    }
}

enum Field {
    Timestamp,
    M,
    FullSolutionResponse,
    Status,
    BestKnownMinScore,
    BestBound,
    VarsFound,
    Unknown,
}

impl Field {
    fn from_key(key: &str) -> Self {
        match key.to_lowercase().as_str() {
            "timestamp" => Field::Timestamp,
            "m" => Field::M,
            "full_solution_response" => Field::FullSolutionResponse,
            "status" => Field::Status,
            "best_known_min_score" => Field::BestKnownMinScore,
            "best_bound" => Field::BestBound,
            "vars_found" => Field::VarsFound,
            _ => Field::Unknown,
        }
    }
}

struct SaveRequestVisitor;

impl<'de> Visitor<'de> for SaveRequestVisitor {
    type Value = SaveRequest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object or null")
    }

    fn visit_unit<E: de::Error>(self) -> Result<SaveRequest, E> {
        Ok(SaveRequest::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SaveRequest, A::Error> {
        let mut req = SaveRequest::default();
        while let Some(key) = map.next_key::<String>()? {
            match Field::from_key(&key) {
                Field::Timestamp => {
                    if let Some(v) = map.next_value::<Option<String>>()? {
                        req.timestamp = v;
                    }
                }
                Field::M => {
                    if let Some(v) = map.next_value::<Option<i64>>()? {
                        req.m = v;
                    }
                }
                Field::Status => {
                    if let Some(v) = map.next_value::<Option<String>>()? {
                        req.status = v;
                    }
                }
                Field::FullSolutionResponse => req.full_solution_response = map.next_value()?,
                Field::BestKnownMinScore => req.best_known_min_score = map.next_value()?,
                Field::BestBound => req.best_bound = map.next_value()?,
                Field::VarsFound => req.vars_found = map.next_value()?,
                Field::Unknown => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(req)
    }
}

impl<'de> Deserialize<'de> for SaveRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SaveRequestVisitor)
    }
}
