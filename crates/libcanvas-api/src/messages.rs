//! REST request and response body types
//!
//! These types define the JSON wire format shared by canvas-server and its
//! clients. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use libcanvas_core::{Project, ProjectChanges, ProjectFile, ProjectId};

/// Body of `POST /api/projects`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub files: Vec<ProjectFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl CreateProjectRequest {
    /// Build the request payload from a full project
    pub fn from_project(project: &Project) -> Self {
        Self {
            project_id: project.project_id.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            files: project.files.clone(),
            owner: project.owner.clone(),
            is_public: project.is_public,
        }
    }

    /// Build the candidate document the store will persist. Timestamps are
    /// placeholders; the store assigns its own on create.
    pub fn into_project(self) -> Project {
        let mut project = Project::new(self.project_id, self.name)
            .with_files(self.files)
            .with_owner(self.owner)
            .with_public(self.is_public);
        project.description = self.description;
        project
    }
}

/// Body of `PUT /api/projects/:projectId`: exactly the mutable fields,
/// replaced wholesale when present
pub type UpdateProjectRequest = ProjectChanges;

/// Error body returned with every non-success status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthBody {
    pub status: String,
    pub store_connected: bool,
    pub message: String,
}

impl HealthBody {
    pub fn ok(store_connected: bool) -> Self {
        Self {
            status: "ok".to_string(),
            store_connected,
            message: "Canvas API is running".to_string(),
        }
    }
}

/// Body of a successful `DELETE /api/projects/:projectId`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBody {
    pub message: String,
}

impl DeleteBody {
    pub fn deleted(project_id: &ProjectId) -> Self {
        Self {
            message: format!("Project '{}' deleted", project_id),
        }
    }
}

/// Query string of `GET /api/projects`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_roundtrips_to_project() {
        let req = CreateProjectRequest {
            project_id: ProjectId::parse("p1").unwrap(),
            name: "Demo".to_string(),
            description: "A demo".to_string(),
            files: vec![ProjectFile::new("/App.js", "code")],
            owner: Some("alice".to_string()),
            is_public: true,
        };

        let project = req.clone().into_project();
        assert_eq!(project.project_id.as_str(), "p1");
        assert_eq!(project.description, "A demo");
        assert_eq!(project.owner.as_deref(), Some("alice"));
        assert!(project.is_public);

        let back = CreateProjectRequest::from_project(&project);
        assert_eq!(back.name, req.name);
        assert_eq!(back.files, req.files);
    }

    #[test]
    fn test_create_request_wire_format() {
        let json = r#"{
            "projectId": "abc",
            "name": "Demo",
            "files": [{"name": "App.js", "path": "/App.js", "content": "x", "type": "file"}],
            "isPublic": true
        }"#;
        let req: CreateProjectRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.project_id.as_str(), "abc");
        assert!(req.is_public);
        assert!(req.owner.is_none());
        assert_eq!(req.description, "");
    }

    #[test]
    fn test_update_request_partial_body() {
        let json = r#"{"name": "Renamed"}"#;
        let req: UpdateProjectRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.name.as_deref(), Some("Renamed"));
        assert!(req.files.is_none());
        assert!(req.is_public.is_none());
    }

    #[test]
    fn test_list_query_wire_name() {
        let query: ListQuery = serde_json::from_str(r#"{"userId": "alice"}"#).unwrap();
        assert_eq!(query.user_id.as_deref(), Some("alice"));
    }

    #[test]
    fn test_health_body() {
        let body = HealthBody::ok(false);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["storeConnected"], false);
    }
}
