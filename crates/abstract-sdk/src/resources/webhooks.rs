//! Webhooks endpoint
//!
//! Webhook management has no CLI counterpart, so every call except
//! signature verification fails with a configuration error in CLI mode.
//! Verification runs locally in any mode.

use super::{OrganizationDescriptor, WebhookDescriptor};
use crate::{
    client::Client, error::Result, options::RequestOptions, signature::SignatureVerifier,
};
use abstract_transport::Operation;
use serde_json::Value;

/// Version pin for the webhooks API family.
pub const API_VERSION: &str = "13";

/// Webhooks resource. API only.
#[derive(Debug, Clone)]
pub struct Webhooks {
    client: Client,
}

impl Webhooks {
    /// Create a new Webhooks resource.
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    async fn api_only(&self, operation: Operation, options: &RequestOptions) -> Result<Value> {
        self.client
            .request(operation.with_api_version(API_VERSION), None, options)
            .await
    }

    /// List an organization's webhooks.
    pub async fn list(
        &self,
        organization: &OrganizationDescriptor,
        options: &RequestOptions,
    ) -> Result<Value> {
        let operation = Operation::get([
            "organizations",
            organization.organization_id.as_str(),
            "webhooks",
        ]);
        self.api_only(operation, options).await
    }

    /// Load one webhook.
    pub async fn info(&self, webhook: &WebhookDescriptor, options: &RequestOptions) -> Result<Value> {
        self.api_only(Operation::get(webhook_path(webhook)), options)
            .await
    }

    /// Create a webhook.
    pub async fn create(
        &self,
        organization: &OrganizationDescriptor,
        webhook: Value,
        options: &RequestOptions,
    ) -> Result<Value> {
        let operation = Operation::post([
            "organizations",
            organization.organization_id.as_str(),
            "webhooks",
        ])
        .with_body(webhook);
        self.api_only(operation, options).await
    }

    /// Update a webhook.
    pub async fn update(
        &self,
        webhook: &WebhookDescriptor,
        changes: Value,
        options: &RequestOptions,
    ) -> Result<Value> {
        let operation = Operation::put(webhook_path(webhook)).with_body(changes);
        self.api_only(operation, options).await
    }

    /// Delete a webhook.
    pub async fn delete(&self, webhook: &WebhookDescriptor, options: &RequestOptions) -> Result<()> {
        self.api_only(Operation::delete(webhook_path(webhook)), options)
            .await?;
        Ok(())
    }

    /// Check a delivery's signature. Runs locally whatever the mode.
    pub async fn verify(&self, payload: &Value, signature: &str, signing_key: &str) -> Result<bool> {
        self.client
            .dispatcher()
            .dispatch_local(move || async move {
                Ok(SignatureVerifier::verify(payload, signature, signing_key))
            })
            .await
    }

    /// Like [`Webhooks::verify`], failing with
    /// [`Error::SignatureMismatch`](crate::Error::SignatureMismatch).
    pub async fn verify_strict(
        &self,
        payload: &Value,
        signature: &str,
        signing_key: &str,
    ) -> Result<()> {
        self.client
            .dispatcher()
            .dispatch_local(move || async move {
                SignatureVerifier::verify_strict(payload, signature, signing_key)
            })
            .await
    }
}

fn webhook_path(webhook: &WebhookDescriptor) -> [&str; 4] {
    [
        "organizations",
        webhook.organization_id.as_str(),
        "webhooks",
        webhook.webhook_id.as_str(),
    ]
}
