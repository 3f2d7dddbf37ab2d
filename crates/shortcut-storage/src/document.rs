//! Configuration document model
//!
//! Keys are camelCase on disk. Fields this model does not know about are kept in
//! `extra` so that a save never drops data written by another version of the app.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const SCHEMA_VERSION: &str = "1.0.0";

/// Root object persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    /// Registered project folders, in creation order
    pub projects: Vec<Project>,
    /// Quick-access links, in creation order
    pub quick_access_sites: Vec<QuickAccessSite>,
    /// Schema version string (not used for migrations)
    pub version: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigDocument {
    /// The document written when no usable file exists
    pub fn seeded(created_at: DateTime<Utc>) -> Self {
        Self {
            projects: Vec::new(),
            quick_access_sites: vec![
                QuickAccessSite {
                    id: "github".to_string(),
                    name: "GitHub".to_string(),
                    url: "https://github.com".to_string(),
                    description: "Source code hosting".to_string(),
                    created_at,
                    extra: Map::new(),
                },
                QuickAccessSite {
                    id: "localhost-3000".to_string(),
                    name: "localhost:3000".to_string(),
                    url: "http://localhost:3000".to_string(),
                    description: "Development server (frequently used)".to_string(),
                    created_at,
                    extra: Map::new(),
                },
            ],
            version: SCHEMA_VERSION.to_string(),
            extra: Map::new(),
        }
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn quick_access_site(&self, id: &str) -> Option<&QuickAccessSite> {
        self.quick_access_sites.iter().find(|s| s.id == id)
    }
}

/// A local project folder that may host a development server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Filesystem directory of the project
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Command used to start the development server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Volatile; reset to false at every process start
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_running: bool,
    #[serde(default, deserialize_with = "lenient_port", skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A bookmarked URL shown in the quick-access bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAccessSite {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Files edited by hand or written by older versions may hold `null` where a value is
// expected. Those fields fall back to their default instead of failing the record.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Anything that is not a valid TCP port reads as "no port"
fn lenient_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_u64())
        .and_then(|port| u16::try_from(port).ok()))
}
