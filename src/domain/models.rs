use std::fmt;
use serde::{Deserialize, Serialize};

/// A geo-point picked by the participant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    /// Builds a location, rejecting non-finite or out-of-range coordinates.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }

    /// Parses `"lat, lng"` text as typed into the location field.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinmap::domain::Location;
    ///
    /// let here = Location::parse("51.5074, -0.1278").unwrap();
    /// assert_eq!(here.lat, 51.5074);
    /// assert!(Location::parse("north-ish").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let (lat, lng) = input.split_once(',')?;
        let lat = lat.trim().parse::<f64>().ok()?;
        let lng = lng.trim().parse::<f64>().ok()?;
        Self::new(lat, lng)
    }
}

impl Location {
    /// Text for the location edit buffer, at full precision so that
    /// re-parsing it yields the same point.
    pub fn to_input_string(&self) -> String {
        format!("{}, {}", self.lat, self.lng)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// A custom question defined by the session's map document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    #[serde(alias = "name")]
    pub field_name: String,
}

/// Session metadata from the map document. Other document keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_no: String,
    #[serde(default)]
    pub map_name: String,
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

impl Session {
    pub fn new(session_no: &str, map_name: &str, group_name: &str) -> Self {
        Self {
            session_no: session_no.to_string(),
            map_name: map_name.to_string(),
            group_name: group_name.to_string(),
            custom_fields: Vec::new(),
        }
    }

    pub fn with_custom_fields(mut self, names: &[&str]) -> Self {
        self.custom_fields = names
            .iter()
            .map(|name| CustomField { field_name: name.to_string() })
            .collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResponse {
    pub field_name: String,
    pub response: String,
}

/// Custom responses keyed by field name, iterated in insertion order.
///
/// Field names are unique: writing an existing name replaces its response in
/// place, writing a new name appends it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CustomResponse>", into = "Vec<CustomResponse>")]
pub struct CustomResponses {
    entries: Vec<CustomResponse>,
}

impl CustomResponses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the response for `field_name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinmap::domain::CustomResponses;
    ///
    /// let mut responses = CustomResponses::new();
    /// responses.upsert("age_group", "adult");
    /// responses.upsert("age_group", "senior");
    /// assert_eq!(responses.len(), 1);
    /// assert_eq!(responses.get("age_group"), Some("senior"));
    /// ```
    pub fn upsert(&mut self, field_name: &str, response: impl Into<String>) {
        let response = response.into();
        match self.entries.iter_mut().find(|entry| entry.field_name == field_name) {
            Some(existing) => existing.response = response,
            None => self.entries.push(CustomResponse {
                field_name: field_name.to_string(),
                response,
            }),
        }
    }

    pub fn get(&self, field_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.field_name == field_name)
            .map(|entry| entry.response.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomResponse> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<CustomResponse>> for CustomResponses {
    fn from(entries: Vec<CustomResponse>) -> Self {
        let mut responses = Self::new();
        for entry in entries {
            responses.upsert(&entry.field_name, entry.response);
        }
        responses
    }
}

impl From<CustomResponses> for Vec<CustomResponse> {
    fn from(responses: CustomResponses) -> Self {
        responses.entries
    }
}

/// A participant as persisted in the session roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub custom_responses: CustomResponses,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parse_accepts_spacing_variants() {
        assert_eq!(Location::parse("40.7,-74.0"), Location::new(40.7, -74.0));
        assert_eq!(Location::parse("  40.7 ,  -74.0 "), Location::new(40.7, -74.0));
    }

    #[test]
    fn test_location_parse_rejects_out_of_range() {
        assert!(Location::parse("91, 0").is_none());
        assert!(Location::parse("0, 181").is_none());
        assert!(Location::parse("NaN, 0").is_none());
        assert!(Location::parse("12.5").is_none());
        assert!(Location::parse("").is_none());
    }

    #[test]
    fn test_location_display() {
        let location = Location::new(1.5, -2.25).unwrap();
        assert_eq!(location.to_string(), "1.50000, -2.25000");
    }

    #[test]
    fn test_upsert_appends_to_empty() {
        let mut responses = CustomResponses::new();
        responses.upsert("color", "red");

        let entries: Vec<_> = responses.iter().cloned().collect();
        assert_eq!(entries, vec![CustomResponse {
            field_name: "color".to_string(),
            response: "red".to_string(),
        }]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut responses = CustomResponses::new();
        responses.upsert("age_group", "adult");
        responses.upsert("color", "red");
        responses.upsert("pet", "cat");
        responses.upsert("age_group", "senior");

        let names: Vec<_> = responses.iter().map(|r| r.field_name.as_str()).collect();
        assert_eq!(names, vec!["age_group", "color", "pet"]);
        assert_eq!(responses.get("age_group"), Some("senior"));
        assert_eq!(responses.get("color"), Some("red"));
        assert_eq!(responses.get("pet"), Some("cat"));
    }

    #[test]
    fn test_input_string_parses_back_exactly() {
        let location = Location::new(51.5074123, -0.1278456).unwrap();
        assert_eq!(location.to_input_string(), "51.5074123, -0.1278456");
        assert_eq!(Location::parse(&location.to_input_string()), Some(location));
        assert_eq!(location.to_string(), "51.50741, -0.12785");
    }

    #[test]
    fn test_decoding_duplicates_keeps_first_position_last_value() {
        let json = r#"[
            {"fieldName": "a", "response": "1"},
            {"fieldName": "b", "response": "2"},
            {"fieldName": "a", "response": "3"}
        ]"#;
        let responses: CustomResponses = serde_json::from_str(json).unwrap();

        let pairs: Vec<_> = responses
            .iter()
            .map(|r| (r.field_name.as_str(), r.response.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_session_decodes_map_document() {
        let json = r#"{
            "sessionNo": "XYZ9",
            "mapName": "campus",
            "groupName": "robotics club",
            "customFields": [{"fieldName": "favourite snack"}, {"name": "major"}],
            "createdBy": "ana"
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();

        assert_eq!(session.session_no, "XYZ9");
        assert_eq!(session.custom_fields.len(), 2);
        assert_eq!(session.custom_fields[1].field_name, "major");
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let mut custom_responses = CustomResponses::new();
        custom_responses.upsert("major", "physics");
        let user = User {
            name: "Ana".to_string(),
            age: "21".to_string(),
            contact: "ana@example.com".to_string(),
            role: "student".to_string(),
            location: Location::new(10.0, 20.0),
            custom_responses,
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["customResponses"][0]["fieldName"], "major");
        assert_eq!(value["location"]["lng"], 20.0);
    }

    #[test]
    fn test_user_decodes_sparse_roster_entry() {
        let user: User = serde_json::from_str(r#"{"name": "Bo"}"#).unwrap();
        assert_eq!(user.name, "Bo");
        assert!(user.location.is_none());
        assert!(user.custom_responses.is_empty());
    }
}
