// 🔎 Issuer Resolver - local table first, remote lookup on miss
// Remote failures degrade to "Unknown" and never reach the caller.

use crate::classifier::{classify_brand, Brand};
use crate::table::{BinTable, UNKNOWN};
use crate::validator::BinCode;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_LOOKUP_URL: &str = "https://lookup.binlist.net";
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);
const ACCEPT_VERSION: &str = "3";

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Where the issuer/country fields came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LookupSource {
    /// Found in the bundled table, no I/O
    LocalTable,
    /// Missing locally, answered by the remote API
    Remote,
    /// Missing locally and the remote call failed
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    pub brand: Brand,
    pub issuer: String,
    pub country: String,
    pub source: LookupSource,
}

/// Issuer/country pair as returned by an `IssuerSource`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerInfo {
    pub issuer: String,
    pub country: String,
}

/// Remote lookup failed; folded into `LookupSource::NotFound`
#[derive(Error, Debug)]
pub enum LookupDegraded {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    Body(#[from] serde_json::Error),
}

// ============================================================================
// REMOTE SOURCE
// ============================================================================

#[async_trait]
pub trait IssuerSource: Send + Sync {
    async fn lookup(&self, bin: &BinCode) -> Result<IssuerInfo, LookupDegraded>;
}

#[derive(Debug, Deserialize, Default)]
struct NamedField {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct BinlistResponse {
    #[serde(default)]
    bank: Option<NamedField>,
    #[serde(default)]
    country: Option<NamedField>,
}

fn name_or_unknown(field: Option<NamedField>) -> String {
    field
        .and_then(|f| f.name)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// HTTP client for the binlist lookup API: `GET {base}/{bin}`
pub struct BinlistClient {
    client: Client,
    base_url: String,
}

impl BinlistClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LookupDegraded> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(BinlistClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl IssuerSource for BinlistClient {
    async fn lookup(&self, bin: &BinCode) -> Result<IssuerInfo, LookupDegraded> {
        let url = format!("{}/{}", self.base_url, bin);

        let response = self
            .client
            .get(&url)
            .header("Accept-Version", ACCEPT_VERSION)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(LookupDegraded::Status(response.status().as_u16()));
        }

        // Read as bytes first so a bad body maps to Body, not Http
        let body = response.bytes().await?;
        let parsed: BinlistResponse = serde_json::from_slice(&body)?;

        Ok(IssuerInfo {
            issuer: name_or_unknown(parsed.bank),
            country: name_or_unknown(parsed.country),
        })
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Combines the read-only table with a remote fallback
#[derive(Clone)]
pub struct Resolver {
    table: Arc<BinTable>,
    remote: Arc<dyn IssuerSource>,
}

impl Resolver {
    pub fn new(table: Arc<BinTable>, remote: Arc<dyn IssuerSource>) -> Self {
        Resolver { table, remote }
    }

    /// Resolve brand, issuer and country for a BIN. Never fails.
    pub async fn resolve(&self, bin: &BinCode) -> LookupResult {
        resolve(bin, &self.table, self.remote.as_ref()).await
    }
}

/// Brand always comes from `classify_brand`; issuer/country from the table,
/// else from one remote call.
pub async fn resolve(bin: &BinCode, table: &BinTable, remote: &dyn IssuerSource) -> LookupResult {
    let brand = classify_brand(bin.as_str());

    if let Some(record) = table.get(bin) {
        tracing::debug!(%bin, "BIN resolved from local table");
        return LookupResult {
            brand,
            issuer: record.issuer.clone(),
            country: record.country.clone(),
            source: LookupSource::LocalTable,
        };
    }

    match remote.lookup(bin).await {
        Ok(info) => {
            tracing::debug!(%bin, "BIN resolved remotely");
            LookupResult {
                brand,
                issuer: info.issuer,
                country: info.country,
                source: LookupSource::Remote,
            }
        }
        Err(e) => {
            tracing::warn!(%bin, error = %e, "remote BIN lookup degraded");
            LookupResult {
                brand,
                issuer: UNKNOWN.to_string(),
                country: UNKNOWN.to_string(),
                source: LookupSource::NotFound,
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
