//! Record types stored in the configuration document
//!
//! Each record type declares how a new record is built from a draft and how a
//! partial update is merged onto an existing one. Unknown keys in drafts and patches
//! are kept, except the ones that name a typed field.

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use shortcut_storage::{ConfigDocument, Project, QuickAccessSite};

use crate::error::RecordKind;

const PROJECT_FIELDS: &[&str] = &[
    "id",
    "name",
    "path",
    "description",
    "command",
    "isRunning",
    "port",
    "createdAt",
    "updatedAt",
];

const SITE_FIELDS: &[&str] = &["id", "name", "url", "description", "createdAt"];

pub trait Record: Clone + Serialize + Send + Sync + 'static {
    /// Caller-supplied fields of a new record
    type Draft: DeserializeOwned + Send;
    /// Partial update
    type Patch: DeserializeOwned + Send;

    const KIND: RecordKind;
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;

    fn collection(doc: &ConfigDocument) -> &[Self];

    fn collection_mut(doc: &mut ConfigDocument) -> &mut Vec<Self>;

    fn create(id: String, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    /// `null` clears the field; an absent key leaves it unchanged
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub command: Option<Option<String>>,
    #[serde(default)]
    pub is_running: Option<bool>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub port: Option<Option<u16>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAccessSiteDraft {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAccessSitePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// `null` resets the description to empty
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Next `updatedAt` value; never earlier than or equal to the previous one
pub(crate) fn advance(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

/// Present-but-null becomes `Some(None)`, so a patch can clear an optional field
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn merge_extra(target: &mut Map<String, Value>, extra: Map<String, Value>, typed: &[&str]) {
    for (key, value) in extra {
        if !typed.contains(&key.as_str()) {
            target.insert(key, value);
        }
    }
}

impl Record for Project {
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    const KIND: RecordKind = RecordKind::Project;
    const ID_PREFIX: &'static str = "project";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(doc: &ConfigDocument) -> &[Self] {
        &doc.projects
    }

    fn collection_mut(doc: &mut ConfigDocument) -> &mut Vec<Self> {
        &mut doc.projects
    }

    fn create(id: String, draft: ProjectDraft, now: DateTime<Utc>) -> Self {
        let mut extra = Map::new();
        merge_extra(&mut extra, draft.extra, PROJECT_FIELDS);

        Self {
            id,
            name: draft.name,
            path: draft.path,
            description: draft.description,
            command: draft.command,
            is_running: false,
            port: None,
            created_at: now,
            updated_at: now,
            extra,
        }
    }

    fn apply(&mut self, patch: ProjectPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(path) = patch.path {
            self.path = path;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(command) = patch.command {
            self.command = command;
        }
        if let Some(is_running) = patch.is_running {
            self.is_running = is_running;
        }
        if let Some(port) = patch.port {
            self.port = port;
        }
        merge_extra(&mut self.extra, patch.extra, PROJECT_FIELDS);
        self.updated_at = advance(self.updated_at, now);
    }
}

impl Record for QuickAccessSite {
    type Draft = QuickAccessSiteDraft;
    type Patch = QuickAccessSitePatch;

    const KIND: RecordKind = RecordKind::QuickAccessSite;
    const ID_PREFIX: &'static str = "site";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(doc: &ConfigDocument) -> &[Self] {
        &doc.quick_access_sites
    }

    fn collection_mut(doc: &mut ConfigDocument) -> &mut Vec<Self> {
        &mut doc.quick_access_sites
    }

    fn create(id: String, draft: QuickAccessSiteDraft, now: DateTime<Utc>) -> Self {
        let mut extra = Map::new();
        merge_extra(&mut extra, draft.extra, SITE_FIELDS);

        Self {
            id,
            name: draft.name,
            url: draft.url,
            description: draft.description,
            created_at: now,
            extra,
        }
    }

    fn apply(&mut self, patch: QuickAccessSitePatch, _now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(description) = patch.description {
            self.description = description.unwrap_or_default();
        }
        merge_extra(&mut self.extra, patch.extra, SITE_FIELDS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_patch_keeps_identity_fields() {
        let created = Utc::now();
        let mut project = Project::create(
            "project_1_aaaaaaaaa".to_string(),
            ProjectDraft {
                name: "Foo".to_string(),
                path: "/tmp/foo".to_string(),
                ..Default::default()
            },
            created,
        );

        let patch: ProjectPatch = serde_json::from_value(json!({
            "id": "hijacked",
            "createdAt": "2000-01-01T00:00:00Z",
            "name": "Bar",
            "framework": "vite"
        }))
        .unwrap();
        project.apply(patch, created);

        assert_eq!(project.id, "project_1_aaaaaaaaa");
        assert_eq!(project.created_at, created);
        assert_eq!(project.name, "Bar");
        assert_eq!(project.path, "/tmp/foo");
        assert!(project.updated_at > created);
        assert_eq!(project.extra.get("framework"), Some(&json!("vite")));
        assert!(!project.extra.contains_key("id"));

        // Serialized form must not carry duplicate keys
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["id"], json!("project_1_aaaaaaaaa"));
    }

    #[test]
    fn test_draft_cannot_mark_project_running() {
        let draft: ProjectDraft = serde_json::from_value(json!({
            "name": "Foo",
            "path": "/tmp/foo",
            "isRunning": true,
            "port": 8080
        }))
        .unwrap();

        let project = Project::create("project_1_x".to_string(), draft, Utc::now());
        assert!(!project.is_running);
        assert_eq!(project.port, None);
        assert!(project.extra.is_empty());
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn test_site_patch() {
        let now = Utc::now();
        let mut site = QuickAccessSite::create(
            "site_1_x".to_string(),
            QuickAccessSiteDraft {
                name: "Docs".to_string(),
                url: "https://docs.rs".to_string(),
                ..Default::default()
            },
            now,
        );
        assert_eq!(site.description, "");

        site.apply(
            QuickAccessSitePatch {
                description: Some(Some("Rust API docs".to_string())),
                ..Default::default()
            },
            now,
        );
        assert_eq!(site.description, "Rust API docs");
        assert_eq!(site.name, "Docs");
        assert_eq!(site.created_at, now);

        let patch: QuickAccessSitePatch =
            serde_json::from_value(json!({ "description": null })).unwrap();
        site.apply(patch, now);
        assert_eq!(site.description, "");
    }

    #[test]
    fn test_null_patch_clears_optional_fields() {
        let now = Utc::now();
        let mut project = Project::create(
            "project_1_aaaaaaaaa".to_string(),
            ProjectDraft {
                name: "Foo".to_string(),
                path: "/tmp/foo".to_string(),
                description: Some("d".to_string()),
                command: Some("npm run dev".to_string()),
                ..Default::default()
            },
            now,
        );
        project.port = Some(3000);

        // Absent keys leave the fields alone
        let patch: ProjectPatch = serde_json::from_value(json!({ "name": "Bar" })).unwrap();
        project.apply(patch, now);
        assert_eq!(project.description.as_deref(), Some("d"));
        assert_eq!(project.command.as_deref(), Some("npm run dev"));
        assert_eq!(project.port, Some(3000));

        let patch: ProjectPatch = serde_json::from_value(json!({
            "description": null,
            "command": null,
            "port": null
        }))
        .unwrap();
        project.apply(patch, now);
        assert_eq!(project.description, None);
        assert_eq!(project.command, None);
        assert_eq!(project.port, None);
        assert!(project.extra.is_empty());

        let value = serde_json::to_value(&project).unwrap();
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_advance_is_strictly_increasing() {
        let now = Utc::now();
        assert!(advance(now, now) > now);
        assert_eq!(advance(now - Duration::seconds(1), now), now);
    }
}
