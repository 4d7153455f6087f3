//! Resolution of compound resource identifiers.
//!
//! Identifiers follow the grammar
//! `arn:<partition>:<service>:<region>:<account>:<kind>/<instance-id>[/<sub-path>]`.
//! Only the kinds managed by this provider are accepted.

use std::fmt::{self, Display, Formatter};

use crate::error::{ApsError, Result};

const ARN_PREFIX: &str = "arn";
const ARN_SECTIONS: usize = 6;

/// Resource kinds that can appear in the kind segment of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Workspace,
    RuleGroupsNamespace,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Workspace => "workspace",
            ResourceKind::RuleGroupsNamespace => "rulegroupsnamespace",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "workspace" => Some(ResourceKind::Workspace),
            "rulegroupsnamespace" => Some(ResourceKind::RuleGroupsNamespace),
            _ => None,
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed identifier together with its resolved identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceArn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account_id: String,
    kind: ResourceKind,
    instance_id: String,
    sub_path: Option<String>,
}

impl ResourceArn {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Short instance id embedded after the kind segment, e.g. `ws-1234`.
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Everything after the instance id, e.g. the namespace name of a
    /// rule-groups namespace.
    pub fn sub_path(&self) -> Option<&str> {
        self.sub_path.as_deref()
    }

    /// Same partition, service, region and account, different resource.
    pub fn with_resource(&self, kind: ResourceKind, instance_id: &str) -> ResourceArn {
        ResourceArn {
            partition: self.partition.clone(),
            service: self.service.clone(),
            region: self.region.clone(),
            account_id: self.account_id.clone(),
            kind,
            instance_id: instance_id.to_string(),
            sub_path: None,
        }
    }
}

impl Display for ResourceArn {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}:{}/{}",
            ARN_PREFIX,
            self.partition,
            self.service,
            self.region,
            self.account_id,
            self.kind,
            self.instance_id
        )?;
        if let Some(sub_path) = &self.sub_path {
            write!(f, "/{}", sub_path)?;
        }
        Ok(())
    }
}

/// Parse a compound identifier.
///
/// # Errors
/// * `ApsError::MalformedIdentifier` when the value does not follow the grammar
/// * `ApsError::UnsupportedKind` when the kind segment is not managed here
pub fn parse_arn(value: &str) -> Result<ResourceArn> {
    let malformed = || ApsError::MalformedIdentifier(format!("invalid ARN format: {}", value));

    // The resource section may itself contain ':' so only split the header.
    let sections: Vec<&str> = value.splitn(ARN_SECTIONS, ':').collect();
    if sections.len() != ARN_SECTIONS || sections[0] != ARN_PREFIX {
        return Err(malformed());
    }
    if sections[1].is_empty() || sections[2].is_empty() {
        return Err(malformed());
    }

    let resource = sections[5];
    let mut parts = resource.splitn(3, '/');
    let kind_segment = parts.next().unwrap_or_default();
    let instance_id = match parts.next() {
        Some(id) if !id.is_empty() => id,
        _ => return Err(malformed()),
    };
    let sub_path = match parts.next() {
        Some("") => return Err(malformed()),
        other => other.map(str::to_string),
    };

    let kind = ResourceKind::from_segment(kind_segment)
        .ok_or_else(|| ApsError::UnsupportedKind(kind_segment.to_string()))?;

    Ok(ResourceArn {
        partition: sections[1].to_string(),
        service: sections[2].to_string(),
        region: sections[3].to_string(),
        account_id: sections[4].to_string(),
        kind,
        instance_id: instance_id.to_string(),
        sub_path,
    })
}

/// Resolve an identifier into its structured form and short instance id.
pub fn resolve(value: &str) -> Result<(ResourceArn, String)> {
    let arn = parse_arn(value)?;
    let id = arn.instance_id().to_string();
    Ok((arn, id))
}
