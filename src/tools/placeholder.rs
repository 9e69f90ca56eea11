//! Tools that are announced but not available yet

pub const COMING_SOON: &str = "Feature coming soon...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub title: &'static str,
    pub description: &'static str,
}

pub const LICENSE_LOOKUP: Placeholder = Placeholder {
    title: "License Status Check",
    description: "Check Microsoft 365 license status for a user",
};

pub const GROUP_MEMBERSHIP: Placeholder = Placeholder {
    title: "Group Membership Tool",
    description: "Check user's group memberships across Microsoft 365",
};
