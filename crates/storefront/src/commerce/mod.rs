//! Remote commerce storefront API client.
//!
//! # Architecture
//!
//! - The commerce platform is the source of truth for prices, availability,
//!   and checkout - NO local sync of its catalog, direct API calls only
//! - Cart mutations are GraphQL documents posted over `reqwest`
//! - The [`RemoteCartApi`] trait is the seam the synced cart depends on,
//!   so tests can substitute an in-process fake
//!
//! # Example
//!
//! ```rust,ignore
//! use anara_storefront::commerce::{CommerceClient, RemoteLineInput};
//!
//! let client = CommerceClient::new(&config.commerce);
//! let cart = client.create_cart(&[RemoteLineInput {
//!     merchandise_id: "gid://commerce/Variant/123".into(),
//!     quantity: 1,
//!     attributes: vec![],
//! }]).await?;
//! // cart.checkout_url is ready for redirect once synced
//! ```

mod client;
pub mod queries;

pub use client::CommerceClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use anara_core::cart::SelectedOption;
use anara_core::types::Money;

/// Errors that can occur when talking to the commerce platform.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response parsed as JSON but did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the platform.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from a mutation (e.g., invalid merchandise id).
    #[error("User error: {0}")]
    UserError(String),
}

/// A GraphQL error returned by the storefront API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .map(|e| {
            if e.path.is_empty() {
                e.message.clone()
            } else {
                let path = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                format!("{} (path: {path})", e.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Remote cart types
// =============================================================================

/// Opaque handle of a cart held by the commerce platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteCartHandle(pub String);

impl std::fmt::Display for RemoteCartHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One line to push to the remote cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLineInput {
    /// Variant id when the product has variants, product id otherwise.
    pub merchandise_id: String,
    pub quantity: u32,
    /// Selected options, carried as line attributes.
    pub attributes: Vec<SelectedOption>,
}

/// A line as resolved by the platform, with authoritative pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCartLine {
    pub merchandise_id: String,
    pub quantity: u32,
    pub unit_price: Money,
}

/// The platform's view of a cart after a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCart {
    pub handle: RemoteCartHandle,
    /// Where the customer completes payment; only valid server-side state.
    pub checkout_url: String,
    pub lines: Vec<RemoteCartLine>,
}

/// Cart operations exposed by the commerce platform.
///
/// [`CommerceClient`] is the production implementation; tests inject fakes.
#[async_trait]
pub trait RemoteCartApi: Send + Sync {
    /// Create a new remote cart seeded with the given lines.
    async fn create_cart(&self, lines: &[RemoteLineInput]) -> Result<RemoteCart, CommerceError>;

    /// Replace the remote cart's lines to match the given lines.
    async fn update_cart_lines(
        &self,
        handle: &RemoteCartHandle,
        lines: &[RemoteLineInput],
    ) -> Result<RemoteCart, CommerceError>;
}
