//! Wire types of the HockeyWeerelt publication API.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Every response wraps its payload in a `data` field.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageMeta {
    pub last_page: u32,
}

/// A club from `/mc/clubs`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Club {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub name: String,
}

/// A team from `/mc/clubs/{club}/teams`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Team {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub short_name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Team details from `/mc/teams/{team}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TeamInfo {
    #[serde(default)]
    pub competitions: Vec<Competition>,
    /// Everything else the API reports about the team.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A competition a team takes part in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Competition {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub name: String,
}

/// Ids are opaque to us; the API sends them as numbers or strings.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_numeric_and_text_ids() {
        let clubs: Envelope<Vec<Club>> = serde_json::from_value(json!({
            "data": [
                {"id": 42, "name": "Clubs A"},
                {"id": "N7", "name": "Clubs B"},
            ]
        }))
        .unwrap();

        assert_eq!(clubs.data[0].id, "42");
        assert_eq!(clubs.data[1].id, "N7");
    }

    #[test]
    fn test_team_info_keeps_details() {
        let info: Envelope<TeamInfo> = serde_json::from_value(json!({
            "data": {
                "id": "t1",
                "name": "Heren 1",
                "competitions": [{"id": 9, "name": "Hoofdklasse"}],
            }
        }))
        .unwrap();

        assert_eq!(
            info.data.competitions,
            vec![Competition {
                id: "9".to_string(),
                name: "Hoofdklasse".to_string()
            }]
        );
        assert_eq!(info.data.details.get("name"), Some(&json!("Heren 1")));
    }

    #[test]
    fn test_team_info_without_competitions() {
        let info: Envelope<TeamInfo> =
            serde_json::from_value(json!({"data": {"id": "t1"}})).unwrap();
        assert!(info.data.competitions.is_empty());
    }

    #[test]
    fn test_missing_data_is_rejected() {
        let payload = json!({"message": "Server Error"});
        assert!(serde_json::from_value::<Envelope<Vec<Club>>>(payload).is_err());
    }
}
