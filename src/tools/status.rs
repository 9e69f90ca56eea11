//! Service status dashboards

use crate::error::{Result, ToolsError};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceLink {
    pub label: &'static str,
    pub url: &'static str,
}

pub const SERVICE_LINKS: [ServiceLink; 3] = [
    ServiceLink {
        label: "Microsoft 365 Service Status",
        url: "https://status.cloud.microsoft",
    },
    ServiceLink {
        label: "Azure Status",
        url: "https://azure.status.microsoft/en-us/status",
    },
    ServiceLink {
        label: "Admin Center Service Health",
        url: "https://admin.microsoft.com/Adminportal/Home#/servicehealth",
    },
];

/// Link by 1-based position, as numbered in the CLI listing
pub fn link_by_number(number: usize) -> Result<&'static ServiceLink> {
    number
        .checked_sub(1)
        .and_then(|idx| SERVICE_LINKS.get(idx))
        .ok_or_else(|| {
            ToolsError::InvalidInput(format!(
                "no status link #{} (choose 1-{})",
                number,
                SERVICE_LINKS.len()
            ))
        })
}

/// Open a link in the default browser
pub fn open_link(link: &ServiceLink) -> Result<()> {
    open::that(link.url)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_are_https() {
        assert_eq!(SERVICE_LINKS.len(), 3);
        for link in &SERVICE_LINKS {
            assert!(link.url.starts_with("https://"), "{}", link.label);
        }
    }

    #[test]
    fn test_link_by_number() {
        assert_eq!(link_by_number(2).unwrap().label, "Azure Status");
        assert!(link_by_number(0).is_err());
        assert!(link_by_number(4).is_err());
    }
}
