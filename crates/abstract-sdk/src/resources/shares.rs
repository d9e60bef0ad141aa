//! Shares endpoint

use super::{OrganizationDescriptor, ShareDescriptor, with_organization};
use crate::{client::Client, error::Result, options::RequestOptions};
use abstract_transport::{CliCommand, Operation};
use serde_json::Value;

/// Share links resource. Available over both transports; not version pinned.
#[derive(Debug, Clone)]
pub struct Shares {
    client: Client,
}

impl Shares {
    /// Create a new Shares resource.
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Load a share link.
    pub async fn info(&self, share: &ShareDescriptor, options: &RequestOptions) -> Result<Value> {
        let operation = Operation::get(["shares", share.share_id.as_str()]);
        let command = CliCommand::new(["share", "load"]).flag("share-id", &share.share_id);

        self.client.request(operation, Some(command), options).await
    }

    /// Create a share link in an organization.
    pub async fn create(
        &self,
        organization: &OrganizationDescriptor,
        share: Value,
        options: &RequestOptions,
    ) -> Result<Value> {
        let body = with_organization(share, organization);
        let command = CliCommand::new(["share", "create"]).json_flag("data", &body);
        let operation = Operation::post(["shares"]).with_body(body);

        self.client.request(operation, Some(command), options).await
    }
}
