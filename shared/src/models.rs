use serde::{Serialize, Deserialize};
use time::OffsetDateTime;
use uuid::Uuid;
use crate::validation::{DEFAULT_COLOR, DEFAULT_SYMBOL};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub symbol: Option<String>,
    pub slogan: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub votes: i64,
    pub created_at: OffsetDateTime,
}

impl Party {
    /// Letter shown in place of a missing logo.
    pub fn initial(&self) -> String {
        self.name.chars().next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

/// Admin-editable fields of a party, used for both create and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PartyDraft {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub slogan: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Default for PartyDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: DEFAULT_COLOR.into(),
            symbol: Some(DEFAULT_SYMBOL.into()),
            slogan: None,
            description: None,
            logo_url: None,
        }
    }
}

impl PartyDraft {
    pub fn from_party(party: &Party) -> Self {
        Self {
            name: party.name.clone(),
            color: party.color.clone(),
            symbol: party.symbol.clone(),
            slogan: party.slogan.clone(),
            description: party.description.clone(),
            logo_url: party.logo_url.clone(),
        }
    }

    /// Trims text, upper-cases the color and turns blank optional fields into `None`.
    pub fn normalized(self) -> Self {
        fn blank_to_none(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            name: self.name.trim().to_string(),
            color: self.color.trim().to_uppercase(),
            symbol: blank_to_none(self.symbol),
            slogan: blank_to_none(self.slogan),
            description: blank_to_none(self.description),
            logo_url: blank_to_none(self.logo_url),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub party: Party,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    pub total_votes: i64,
    pub leader: Option<Party>,
    pub standings: Vec<Standing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLogin {
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResetSummary {
    pub parties_reset: u64,
}
