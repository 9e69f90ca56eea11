//! Tenant ID lookup
//!
//! Resolves the Entra ID (Azure AD) tenant behind an email domain by reading
//! the domain's public OpenID discovery document. The tenant ID is the first
//! path segment of the `issuer` URL:
//!
//! ```text
//! https://login.microsoftonline.com/{tenant-id}/v2.0
//! ```

use crate::error::{Result, ToolsError};
use crate::http::Fetcher;
use serde::{Deserialize, Serialize};

/// Shown for every lookup failure, whatever the cause
pub const TENANT_LOOKUP_ERROR: &str = "Unable to find tenant ID. Please verify the email domain.";

/// Position of the tenant ID once the issuer is split on '/'
const ISSUER_TENANT_SEGMENT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantLookup {
    pub domain: String,
    pub issuer: String,
    pub tenant_id: String,
}

#[derive(Debug, Deserialize)]
struct OpenIdConfiguration {
    issuer: String,
}

/// Domain part of an email address.
///
/// Requires exactly one '@' with something on both sides; anything else is
/// rejected before a request is made.
pub fn domain_from_email(email: &str) -> Result<&str> {
    let email = email.trim();
    let mut parts = email.split('@');

    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => {
            if domain.chars().any(char::is_whitespace) {
                return Err(ToolsError::InvalidInput(format!(
                    "'{}' is not a valid domain",
                    domain
                )));
            }
            Ok(domain)
        }
        _ => Err(ToolsError::InvalidInput(format!(
            "'{}' is not an email address",
            email
        ))),
    }
}

/// Tenant ID from an OIDC issuer URL (path segment index 3)
pub fn tenant_id_from_issuer(issuer: &str) -> Result<String> {
    issuer
        .split('/')
        .nth(ISSUER_TENANT_SEGMENT)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ToolsError::MalformedResponse(format!("issuer '{}' has no tenant segment", issuer))
        })
}

pub fn discovery_url(authority: &str, domain: &str) -> String {
    format!(
        "{}/{}/v2.0/.well-known/openid-configuration",
        authority.trim_end_matches('/'),
        domain
    )
}

/// Look up the tenant ID for an email address
pub async fn lookup_tenant(
    fetcher: &dyn Fetcher,
    authority: &str,
    email: &str,
) -> Result<TenantLookup> {
    let domain = domain_from_email(email)?;
    let url = discovery_url(authority, domain);

    let document = fetcher.get_json(&url, &[]).await?;
    let discovery: OpenIdConfiguration = serde_json::from_value(document)?;
    let tenant_id = tenant_id_from_issuer(&discovery.issuer)?;

    tracing::debug!(domain, tenant_id = %tenant_id, "resolved tenant");

    Ok(TenantLookup {
        domain: domain.to_string(),
        issuer: discovery.issuer,
        tenant_id,
    })
}

/// [`lookup_tenant`] with every failure collapsed to [`TENANT_LOOKUP_ERROR`]
pub async fn lookup_tenant_for_display(
    fetcher: &dyn Fetcher,
    authority: &str,
    email: &str,
) -> std::result::Result<TenantLookup, String> {
    lookup_tenant(fetcher, authority, email).await.map_err(|e| {
        tracing::debug!(email, error = %e, "tenant lookup failed");
        TENANT_LOOKUP_ERROR.to_string()
    })
}
