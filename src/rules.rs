use std::collections::HashMap;

use async_trait::async_trait;

/// Context lookups hand out `dummy-value-for-<name>` until the shared
/// listener has been provisioned, so a placeholder ARN means there are no
/// rules to collide with yet.
pub const PLACEHOLDER_PREFIX: &str = "dummy";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ListError {
    #[error("Listener {0} not found")]
    ListenerNotFound(String),

    #[error("Service error occurred: {0}.")]
    ServiceError(String),

    #[error("Unknown error occurred: {0}.")]
    UnknownError(String),

    #[error("Malformed rule: {0}")]
    MalformedRule(String),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AllocateError {
    #[error("At least one host header is required")]
    NoHostHeaders,

    #[error("Failed to list listener rules: {0}")]
    List(#[from] ListError),
}

/// A listener rule as seen by the allocator. Decoded from provider types at
/// the adapter boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenerRule {
    /// The catch-all rule every listener carries. It has no numeric
    /// priority and never participates in allocation.
    Default,
    Numbered {
        priority: u32,
        host_headers: Vec<String>,
    },
}

#[async_trait]
pub trait RuleLister {
    async fn list_rules(&self, listener_arn: &str) -> Result<Vec<ListenerRule>, ListError>;
}

/// Picks the priority for a new host-header rule on a shared listener.
///
/// A hostname that already has a rule keeps its priority, so re-planning a
/// deployed service does not move its rule. Anything else gets the next
/// number above the current maximum, or `1` on an empty listener.
pub async fn allocate_priority<L: RuleLister>(
    lister: &L,
    listener_arn: &str,
    host_headers: &[String],
) -> Result<u32, AllocateError> {
    let wanted = match host_headers.first() {
        Some(host) => host,
        None => return Err(AllocateError::NoHostHeaders),
    };

    if listener_arn.starts_with(PLACEHOLDER_PREFIX) {
        return Ok(1);
    }

    let rules = lister.list_rules(listener_arn).await?;

    let assigned: HashMap<&str, u32> = rules
        .iter()
        .filter_map(|rule| match rule {
            ListenerRule::Numbered {
                priority,
                host_headers,
            } => host_headers.first().map(|host| (host.as_str(), *priority)),
            ListenerRule::Default => None,
        })
        .collect();

    let highest = match assigned.values().max() {
        Some(highest) => *highest,
        None => return Ok(1),
    };

    let priority = match assigned.get(wanted.as_str()) {
        Some(existing) => *existing,
        None => highest + 1,
    };
    tracing::debug!(host = wanted.as_str(), priority, "allocated rule priority");

    return Ok(priority);
}
