use serde::{Deserialize, Deserializer};

pub mod chart;
pub mod dashboard;
pub mod enquiry;
pub mod envelope;
pub mod listing;
pub mod user;

/// Backend ids show up both as strings and as integers depending on the resource.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(id) => id,
            RawId::Number(id) => id.to_string(),
        }
    }
}

pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Record {
        #[serde(deserialize_with = "super::deserialize_id")]
        id: String,
        #[serde(default, deserialize_with = "super::deserialize_optional_id")]
        parent: Option<String>,
    }

    #[test]
    fn ids_accept_numbers_and_strings() {
        let numeric: Record = serde_json::from_value(json!({ "id": 42 })).unwrap();
        assert_eq!(numeric.id, "42");
        assert_eq!(numeric.parent, None);

        let textual: Record =
            serde_json::from_value(json!({ "id": "64f0c2", "parent": 7 })).unwrap();
        assert_eq!(textual.id, "64f0c2");
        assert_eq!(textual.parent.as_deref(), Some("7"));
    }
}
