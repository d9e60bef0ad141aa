//! Projects endpoint

use super::{OrganizationDescriptor, ProjectDescriptor, organization_query, with_organization};
use crate::{client::Client, error::Result, options::RequestOptions};
use abstract_transport::{CliCommand, Operation};
use serde_json::Value;

/// Version pin for the projects API family.
pub const API_VERSION: &str = "22";

/// Projects resource. Available over both transports.
#[derive(Debug, Clone)]
pub struct Projects {
    client: Client,
}

impl Projects {
    /// Create a new Projects resource.
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List projects, optionally within one organization.
    pub async fn list(
        &self,
        organization: Option<&OrganizationDescriptor>,
        options: &RequestOptions,
    ) -> Result<Value> {
        let mut operation = Operation::get(["projects"]).with_api_version(API_VERSION);
        if let Some(organization) = organization {
            operation = operation.with_query(organization_query(organization));
        }
        let command = CliCommand::new(["projects", "list"]).flag_opt(
            "organization-id",
            organization.map(|o| o.organization_id.as_str()),
        );

        self.client.request(operation, Some(command), options).await
    }

    /// Load one project.
    pub async fn info(&self, project: &ProjectDescriptor, options: &RequestOptions) -> Result<Value> {
        let operation =
            Operation::get(["projects", project.project_id.as_str()]).with_api_version(API_VERSION);
        let command = CliCommand::new(["project", "load"]).flag("project-id", &project.project_id);

        self.client.request(operation, Some(command), options).await
    }

    /// Create a project in an organization.
    pub async fn create(
        &self,
        organization: &OrganizationDescriptor,
        project: Value,
        options: &RequestOptions,
    ) -> Result<Value> {
        let body = with_organization(project, organization);
        let command = CliCommand::new(["project", "create"])
            .flag("organization-id", &organization.organization_id)
            .json_flag("data", &body);
        let operation = Operation::post([
            "organizations",
            organization.organization_id.as_str(),
            "projects",
        ])
        .with_api_version(API_VERSION)
        .with_body(body);

        self.client.request(operation, Some(command), options).await
    }

    /// Update a project.
    pub async fn update(
        &self,
        project: &ProjectDescriptor,
        changes: Value,
        options: &RequestOptions,
    ) -> Result<Value> {
        let command = CliCommand::new(["project", "update"])
            .flag("project-id", &project.project_id)
            .json_flag("data", &changes);
        let operation = Operation::put(["projects", project.project_id.as_str()])
            .with_api_version(API_VERSION)
            .with_body(changes);

        self.client.request(operation, Some(command), options).await
    }

    /// Delete a project.
    pub async fn delete(&self, project: &ProjectDescriptor, options: &RequestOptions) -> Result<()> {
        let operation = Operation::delete(["projects", project.project_id.as_str()])
            .with_api_version(API_VERSION);
        let command =
            CliCommand::new(["project", "delete"]).flag("project-id", &project.project_id);

        self.client.request(operation, Some(command), options).await?;
        Ok(())
    }
}
