//! HTTP client for the commerce platform's storefront API.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use async_trait::async_trait;

use crate::config::CommerceConfig;

use super::queries::{
    CART_CREATE, CART_LINES_REPLACE, CartCreateData, CartLinesReplaceData, CartMutationPayload,
    join_user_errors,
};
use super::{CommerceError, GraphQLError, RemoteCart, RemoteCartHandle, RemoteLineInput};

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<serde_json::Value>,
    errors: Option<Vec<WireGraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct WireGraphQLError {
    message: String,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

/// Client for the commerce platform's storefront API.
///
/// Cart state is mutable server-side, so responses are never cached.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl CommerceClient {
    /// Create a new storefront API client.
    #[must_use]
    pub fn new(config: &CommerceConfig) -> Self {
        let endpoint = format!(
            "https://{}/api/{}/graphql.json",
            config.store_domain, config.api_version
        );

        Self {
            inner: Arc::new(ClientInner {
                http: reqwest::Client::new(),
                endpoint,
                access_token: config.storefront_token.expose_secret().to_string(),
            }),
        }
    }

    /// Execute a GraphQL document.
    async fn execute(
        &self,
        query: &'static str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, CommerceError> {
        let response = self
            .inner
            .http
            .post(&self.inner.endpoint)
            .header("X-Storefront-Access-Token", &self.inner.access_token)
            .header("Content-Type", "application/json")
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CommerceError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "storefront API returned non-success status"
            );
            return Err(CommerceError::GraphQL(vec![GraphQLError {
                message: format!(
                    "HTTP {status}: {}",
                    body.chars().take(200).collect::<String>()
                ),
                path: vec![],
            }]));
        }

        let envelope: Envelope = match serde_json::from_str(&body) {
            Ok(e) => e,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "failed to parse storefront API response"
                );
                return Err(CommerceError::Parse(e));
            }
        };

        if let Some(errors) = envelope.errors
            && !errors.is_empty()
        {
            tracing::debug!(errors = ?errors, "GraphQL errors in response");
            return Err(CommerceError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        path: e.path,
                    })
                    .collect(),
            ));
        }

        envelope.data.ok_or_else(|| {
            tracing::error!(
                body = %body.chars().take(500).collect::<String>(),
                "storefront API response has no data and no errors"
            );
            CommerceError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                path: vec![],
            }])
        })
    }

    /// Extract the cart from a mutation payload, surfacing user errors.
    fn cart_from_payload(
        payload: Option<CartMutationPayload>,
        operation: &str,
    ) -> Result<RemoteCart, CommerceError> {
        let Some(payload) = payload else {
            return Err(CommerceError::Decode(format!("{operation}: missing payload")));
        };

        if !payload.user_errors.is_empty() {
            return Err(CommerceError::UserError(join_user_errors(
                &payload.user_errors,
            )));
        }

        payload
            .cart
            .ok_or_else(|| CommerceError::NotFound(format!("{operation}: no cart in response")))?
            .try_into()
    }

    fn lines_to_variables(lines: &[RemoteLineInput]) -> serde_json::Value {
        json!(
            lines
                .iter()
                .map(|line| {
                    json!({
                        "merchandiseId": line.merchandise_id,
                        "quantity": line.quantity,
                        "attributes": line
                            .attributes
                            .iter()
                            .map(|a| json!({ "key": a.name, "value": a.value }))
                            .collect::<Vec<_>>(),
                    })
                })
                .collect::<Vec<_>>()
        )
    }
}

#[async_trait]
impl super::RemoteCartApi for CommerceClient {
    /// Create a new cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the creation fails or user errors are returned.
    #[instrument(skip(self, lines))]
    async fn create_cart(&self, lines: &[RemoteLineInput]) -> Result<RemoteCart, CommerceError> {
        let variables = json!({
            "input": { "lines": Self::lines_to_variables(lines) }
        });

        let data = self.execute(CART_CREATE, variables).await?;
        let data: CartCreateData = serde_json::from_value(data)?;

        Self::cart_from_payload(data.cart_create, "cartCreate")
    }

    /// Replace the lines of an existing cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart = %handle))]
    async fn update_cart_lines(
        &self,
        handle: &RemoteCartHandle,
        lines: &[RemoteLineInput],
    ) -> Result<RemoteCart, CommerceError> {
        let variables = json!({
            "cartId": handle.0,
            "lines": Self::lines_to_variables(lines),
        });

        let data = self.execute(CART_LINES_REPLACE, variables).await?;
        let data: CartLinesReplaceData = serde_json::from_value(data)?;

        Self::cart_from_payload(data.cart_lines_replace, "cartLinesReplace")
    }
}
