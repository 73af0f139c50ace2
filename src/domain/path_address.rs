// Path address - Base URL a dashboard is served from
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// First segment of every dashboard base path.
pub const DAZZLER_ROOT: &str = "/dazzler";

/// Reserved segment between the service path and the dashboard path.
pub const BOARD_PATH_SEPARATOR: &str = "-";

const CURRENT_DIR: &str = ".";
const PARENT_DIR: &str = "..";

// Punctuation a path segment may carry as is (RFC 3986 `pchar` without
// percent escapes). Anything else reaches the server escaped and would never
// match the mount point.
const SEGMENT_PUNCTUATION: &str = "-._~!$&'()*+,;=:@";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("tenant name must not be empty")]
    EmptyTenant,

    #[error("invalid tenant name {0:?}: must be a single path segment")]
    InvalidTenant(String),

    #[error("path {0:?} contains a reserved segment ('-' or '..')")]
    ReservedSegment(String),

    #[error("segment {0:?} holds characters that need URL escaping")]
    UnsafeSegment(String),

    #[error("{path:?} is not a dashboard base path: {reason}")]
    MalformedPath { path: String, reason: &'static str },
}

/// Structured base URL of a dashboard app:
///
/// ```text
/// /dazzler/<tenant>/<service path>/-/<dashboard path>/
/// ```
///
/// Service and dashboard paths are optional. The rendered form always starts
/// with [`DAZZLER_ROOT`], always ends with `/` and always holds exactly one
/// [`BOARD_PATH_SEPARATOR`] segment, so [`PathAddress::parse`] can split it
/// back into its three components.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathAddress {
    tenant: String,
    service_path: Vec<String>,
    dashboard_path: Vec<String>,
}

impl PathAddress {
    pub fn new(tenant: &str, service_path: &str, dashboard_path: &str) -> Result<Self, PathError> {
        if tenant.is_empty() {
            return Err(PathError::EmptyTenant);
        }
        let tenant = tenant.strip_prefix('/').unwrap_or(tenant);
        if tenant.is_empty() || tenant.contains('/') || tenant == CURRENT_DIR || tenant == PARENT_DIR {
            return Err(PathError::InvalidTenant(tenant.to_string()));
        }
        if tenant == BOARD_PATH_SEPARATOR {
            return Err(PathError::ReservedSegment(tenant.to_string()));
        }
        check_characters(tenant)?;

        Ok(Self {
            tenant: tenant.to_string(),
            service_path: Self::checked_segments(service_path)?,
            dashboard_path: Self::checked_segments(dashboard_path)?,
        })
    }

    /// Address with no service path and no dashboard path.
    pub fn for_tenant(tenant: &str) -> Result<Self, PathError> {
        Self::new(tenant, "/", "/")
    }

    /// Recover the address from a string produced by [`PathAddress::render`].
    pub fn parse(rendered: &str) -> Result<Self, PathError> {
        let malformed = |reason| PathError::MalformedPath {
            path: rendered.to_string(),
            reason,
        };

        let root = DAZZLER_ROOT.trim_start_matches('/');
        let mut segments = split_segments(rendered);

        if segments.next() != Some(root) {
            return Err(malformed("missing root segment"));
        }
        let tenant = match segments.next() {
            Some(t) if t != BOARD_PATH_SEPARATOR => t,
            _ => return Err(malformed("missing tenant segment")),
        };

        let rest: Vec<&str> = segments.collect();
        let sep = rest
            .iter()
            .position(|s| *s == BOARD_PATH_SEPARATOR)
            .ok_or_else(|| malformed("missing board path separator"))?;
        let (service_path, dashboard_path) = (&rest[..sep], &rest[sep + 1..]);
        if dashboard_path.contains(&BOARD_PATH_SEPARATOR) {
            return Err(malformed("more than one board path separator"));
        }
        if tenant == PARENT_DIR || rest.contains(&PARENT_DIR) {
            return Err(malformed("parent directory segment"));
        }

        Ok(Self {
            tenant: tenant.to_string(),
            service_path: service_path.iter().map(|s| s.to_string()).collect(),
            dashboard_path: dashboard_path.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn render(&self) -> String {
        let mut path = String::from(DAZZLER_ROOT);
        path.push('/');
        path.push_str(&self.tenant);
        for segment in &self.service_path {
            path.push('/');
            path.push_str(segment);
        }
        path.push('/');
        path.push_str(BOARD_PATH_SEPARATOR);
        for segment in &self.dashboard_path {
            path.push('/');
            path.push_str(segment);
        }
        path.push('/');
        path
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn service_path(&self) -> String {
        join_absolute(&self.service_path)
    }

    pub fn dashboard_path(&self) -> String {
        join_absolute(&self.dashboard_path)
    }

    fn checked_segments(path: &str) -> Result<Vec<String>, PathError> {
        let segments: Vec<String> = split_segments(path).map(str::to_string).collect();
        if segments.iter().any(|s| s == BOARD_PATH_SEPARATOR || s == PARENT_DIR) {
            return Err(PathError::ReservedSegment(path.to_string()));
        }
        for segment in &segments {
            check_characters(segment)?;
        }
        Ok(segments)
    }
}

impl fmt::Display for PathAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for PathAddress {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Empty and `.` segments go away, so leading, trailing and doubled slashes
// all normalise the way a POSIX path does.
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty() && *s != CURRENT_DIR)
}

fn check_characters(segment: &str) -> Result<(), PathError> {
    let safe = segment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || SEGMENT_PUNCTUATION.contains(c));
    if safe {
        Ok(())
    } else {
        Err(PathError::UnsafeSegment(segment.to_string()))
    }
}

fn join_absolute(segments: &[String]) -> String {
    let mut path = String::from("/");
    for segment in segments {
        path.push_str(segment);
        path.push('/');
    }
    path
}
