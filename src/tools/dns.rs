//! Mail DNS record check over DNS-over-HTTPS
//!
//! Three lookups against a JSON DoH resolver (Google `resolve`, Cloudflare
//! `dns-query` and compatible):
//!
//! - `MX` on the domain
//! - `TXT` on the domain, scanned for an SPF record (`v=spf1`)
//! - `TXT` on `{selector}._domainkey.{domain}` for DKIM
//!
//! Presence only. Record contents are not validated.

use crate::error::Result;
use crate::http::Fetcher;
use serde::{Deserialize, Serialize};

/// Shown for every check failure, whatever the cause
pub const DNS_CHECK_ERROR: &str = "Failed to check DNS records. Please verify the domain and try again.";

const SPF_MARKER: &str = "v=spf1";

#[derive(Debug, Clone, Deserialize)]
pub struct DohResponse {
    #[serde(rename = "Status", default)]
    pub status: Option<u32>,

    #[serde(rename = "Answer", default)]
    pub answer: Option<Vec<DohAnswer>>,
}

/// One answer record; only its data is inspected
#[derive(Debug, Clone, Deserialize)]
pub struct DohAnswer {
    #[serde(default)]
    pub data: String,
}

impl DohResponse {
    pub fn has_answers(&self) -> bool {
        self.answer.as_ref().is_some_and(|a| !a.is_empty())
    }

    pub fn has_spf(&self) -> bool {
        self.answer
            .iter()
            .flatten()
            .any(|record| record.data.contains(SPF_MARKER))
    }
}

/// Outcome of a domain check as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DnsCheckState {
    Empty,
    Result {
        has_mx: bool,
        has_spf: bool,
        has_dkim: bool,
    },
    Error {
        message: String,
    },
}

impl DnsCheckState {
    /// Split into a form outcome: errors become their message
    pub fn into_outcome(self) -> std::result::Result<DnsCheckState, String> {
        match self {
            DnsCheckState::Error { message } => Err(message),
            other => Ok(other),
        }
    }

    /// (label, found) rows for rendering; empty unless a result is present
    pub fn rows(&self) -> Vec<(&'static str, bool)> {
        match self {
            DnsCheckState::Result {
                has_mx,
                has_spf,
                has_dkim,
            } => vec![("MX", *has_mx), ("SPF", *has_spf), ("DKIM", *has_dkim)],
            DnsCheckState::Empty | DnsCheckState::Error { .. } => Vec::new(),
        }
    }
}

pub fn found_label(found: bool) -> &'static str {
    if found { "Found" } else { "Not Found" }
}

/// Trim and lowercase
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().to_lowercase()
}

pub fn dkim_name(selector: &str, domain: &str) -> String {
    format!("{}._domainkey.{}", selector, domain)
}

async fn query(
    fetcher: &dyn Fetcher,
    endpoint: &str,
    name: &str,
    record_type: &str,
) -> Result<DohResponse> {
    let body = fetcher
        .get_json(endpoint, &[("name", name), ("type", record_type)])
        .await?;
    let response: DohResponse = serde_json::from_value(body)?;
    tracing::debug!(
        name,
        record_type,
        status = ?response.status,
        answers = response.answer.as_ref().map_or(0, Vec::len),
        "DoH answer"
    );
    Ok(response)
}

/// Run the three lookups concurrently. Any failure fails the whole check.
pub async fn lookup_records(
    fetcher: &dyn Fetcher,
    endpoint: &str,
    selector: &str,
    domain: &str,
) -> Result<(bool, bool, bool)> {
    let dkim_host = dkim_name(selector, domain);

    let (mx, txt, dkim) = tokio::try_join!(
        query(fetcher, endpoint, domain, "MX"),
        query(fetcher, endpoint, domain, "TXT"),
        query(fetcher, endpoint, &dkim_host, "TXT"),
    )?;

    Ok((mx.has_answers(), txt.has_spf(), dkim.has_answers()))
}

/// Check a domain and fold the outcome into a [`DnsCheckState`]
pub async fn check_domain(
    fetcher: &dyn Fetcher,
    endpoint: &str,
    selector: &str,
    domain: &str,
) -> DnsCheckState {
    let domain = normalize_domain(domain);
    if domain.is_empty() {
        return DnsCheckState::Empty;
    }

    match lookup_records(fetcher, endpoint, selector, &domain).await {
        Ok((has_mx, has_spf, has_dkim)) => DnsCheckState::Result {
            has_mx,
            has_spf,
            has_dkim,
        },
        Err(e) => {
            tracing::debug!(domain = %domain, error = %e, "DNS check failed");
            DnsCheckState::Error {
                message: DNS_CHECK_ERROR.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::StubFetcher;
    use serde_json::json;

    const ENDPOINT: &str = "https://dns.example/resolve";

    fn key(name: &str, record_type: &str) -> String {
        format!("{}?name={}&type={}", ENDPOINT, name, record_type)
    }

    fn mx_answer() -> serde_json::Value {
        json!({
            "Status": 0,
            "Answer": [
                {"name": "contoso.com.", "type": 15, "TTL": 3600, "data": "0 contoso-com.mail.protection.outlook.com."}
            ]
        })
    }

    #[tokio::test]
    async fn test_mx_spf_found_dkim_missing() {
        let fetcher = StubFetcher::new()
            .ok(&key("contoso.com", "MX"), mx_answer())
            .ok(
                &key("contoso.com", "TXT"),
                json!({"Status": 0, "Answer": [
                    {"name": "contoso.com.", "type": 16, "data": "\"MS=ms12345678\""},
                    {"name": "contoso.com.", "type": 16, "data": "\"v=spf1 include:spf.protection.outlook.com -all\""}
                ]}),
            )
            .ok(
                &key("selector1._domainkey.contoso.com", "TXT"),
                json!({"Status": 0, "Answer": []}),
            );

        let state = check_domain(&fetcher, ENDPOINT, "selector1", "  Contoso.COM ").await;
        assert_eq!(
            state,
            DnsCheckState::Result {
                has_mx: true,
                has_spf: true,
                has_dkim: false
            }
        );
        assert_eq!(
            state.rows(),
            vec![("MX", true), ("SPF", true), ("DKIM", false)]
        );
    }

    #[tokio::test]
    async fn test_txt_without_spf_and_missing_answer_key() {
        let fetcher = StubFetcher::new()
            .ok(&key("fabrikam.com", "MX"), json!({"Status": 3}))
            .ok(
                &key("fabrikam.com", "TXT"),
                json!({"Status": 0, "Answer": [{"data": "google-site-verification=abc"}]}),
            )
            .ok(
                &key("selector2._domainkey.fabrikam.com", "TXT"),
                json!({"Status": 0, "Answer": [
                    {"type": 5, "data": "selector2-fabrikam-com._domainkey.fabrikam.onmicrosoft.com."}
                ]}),
            );

        let state = check_domain(&fetcher, ENDPOINT, "selector2", "fabrikam.com").await;
        assert_eq!(
            state,
            DnsCheckState::Result {
                has_mx: false,
                has_spf: false,
                has_dkim: true
            }
        );
    }

    #[tokio::test]
    async fn test_any_failure_is_single_error() {
        let fetcher = StubFetcher::new()
            .ok(&key("contoso.com", "MX"), mx_answer())
            .fail(&key("contoso.com", "TXT"), "timed out")
            .ok(
                &key("selector1._domainkey.contoso.com", "TXT"),
                json!({"Status": 0}),
            );

        let state = check_domain(&fetcher, ENDPOINT, "selector1", "contoso.com").await;
        assert_eq!(
            state,
            DnsCheckState::Error {
                message: DNS_CHECK_ERROR.to_string()
            }
        );
        assert!(state.rows().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_error() {
        let fetcher = StubFetcher::new()
            .ok(&key("contoso.com", "MX"), json!({"Answer": "nope"}))
            .ok(&key("contoso.com", "TXT"), json!({}))
            .ok(&key("selector1._domainkey.contoso.com", "TXT"), json!({}));

        let state = check_domain(&fetcher, ENDPOINT, "selector1", "contoso.com").await;
        assert!(matches!(state, DnsCheckState::Error { .. }));
    }

    #[tokio::test]
    async fn test_blank_domain_is_empty() {
        let fetcher = StubFetcher::new();
        let state = check_domain(&fetcher, ENDPOINT, "selector1", "   ").await;
        assert_eq!(state, DnsCheckState::Empty);
        assert_eq!(fetcher.call_count(), 0);
    }

    #[test]
    fn test_state_serializes_tagged() {
        let state = DnsCheckState::Result {
            has_mx: true,
            has_spf: false,
            has_dkim: true,
        };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({"kind": "result", "has_mx": true, "has_spf": false, "has_dkim": true})
        );
        assert_eq!(found_label(false), "Not Found");
    }

    #[test]
    fn test_into_outcome() {
        let error = DnsCheckState::Error {
            message: DNS_CHECK_ERROR.into(),
        };
        assert_eq!(error.into_outcome(), Err(DNS_CHECK_ERROR.to_string()));
        assert_eq!(DnsCheckState::Empty.into_outcome(), Ok(DnsCheckState::Empty));
    }
}
