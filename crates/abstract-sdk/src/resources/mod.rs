//! Resource endpoints
//!
//! Each resource is a thin declaration of paths, CLI verbs and payloads on
//! top of [`Client::request`](crate::Client::request). They return the
//! caller-visible payload as JSON.

pub mod projects;
pub mod shares;
pub mod webhooks;

pub use projects::Projects;
pub use shares::Shares;
pub use webhooks::Webhooks;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifies an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDescriptor {
    /// Organization ID
    pub organization_id: String,
}

impl OrganizationDescriptor {
    /// Descriptor for `organization_id`.
    pub fn new(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
        }
    }
}

/// Identifies a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
    /// Project ID
    pub project_id: String,
}

impl ProjectDescriptor {
    /// Descriptor for `project_id`.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }
}

/// Identifies a webhook within its organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookDescriptor {
    /// Owning organization ID
    pub organization_id: String,
    /// Webhook ID
    pub webhook_id: String,
}

impl WebhookDescriptor {
    /// Descriptor for a webhook.
    pub fn new(organization_id: impl Into<String>, webhook_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            webhook_id: webhook_id.into(),
        }
    }
}

/// Identifies a share link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareDescriptor {
    /// Share ID
    pub share_id: String,
}

impl ShareDescriptor {
    /// Descriptor for `share_id`.
    pub fn new(share_id: impl Into<String>) -> Self {
        Self {
            share_id: share_id.into(),
        }
    }

    /// Descriptor from a share URL such as `https://share.goabstract.com/<id>`.
    ///
    /// Takes the last non-empty path segment; `None` if the URL has none.
    pub fn from_url(share_url: &str) -> Option<Self> {
        let url = url::Url::parse(share_url).ok()?;
        url.path_segments()?
            .rev()
            .find(|segment| !segment.is_empty())
            .map(Self::new)
    }
}

/// `organizationId=<id>`, form-encoded.
pub(crate) fn organization_query(organization: &OrganizationDescriptor) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("organizationId", &organization.organization_id)
        .finish()
}

/// Copy `organizationId` into an object body; other bodies are left as is.
pub(crate) fn with_organization(mut body: Value, organization: &OrganizationDescriptor) -> Value {
    if let Value::Object(map) = &mut body {
        map.insert(
            "organizationId".to_string(),
            Value::String(organization.organization_id.clone()),
        );
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_share_descriptor_from_url() {
        assert_eq!(
            ShareDescriptor::from_url("https://share.goabstract.com/8d0c3e5a-1b2f/"),
            Some(ShareDescriptor::new("8d0c3e5a-1b2f"))
        );
        assert_eq!(ShareDescriptor::from_url("https://share.goabstract.com/"), None);
        assert_eq!(ShareDescriptor::from_url("not a url"), None);
    }

    #[test]
    fn test_organization_query_is_encoded() {
        let org = OrganizationDescriptor::new("a b&c");
        assert_eq!(organization_query(&org), "organizationId=a+b%26c");
    }

    #[test]
    fn test_with_organization() {
        let org = OrganizationDescriptor::new("o-1");
        assert_eq!(
            with_organization(json!({"kind": "project"}), &org),
            json!({"kind": "project", "organizationId": "o-1"})
        );
        assert_eq!(with_organization(json!([1]), &org), json!([1]));
    }

    #[test]
    fn test_descriptors_use_camel_case() {
        let webhook = WebhookDescriptor::new("o-1", "w-1");
        assert_eq!(
            serde_json::to_value(&webhook).unwrap(),
            json!({"organizationId": "o-1", "webhookId": "w-1"})
        );
    }
}
