//! core::types
//!
//! Strong types for the repository-state domain.
//!
//! # Types
//!
//! - [`Oid`] - Git object identifier (SHA)
//! - [`RefName`] - Validated full reference name (`refs/heads/main`)
//! - [`BranchRef`] - A local or remote-tracking branch and what it points at
//! - [`RefTarget`] - A resolved commit, or the unresolvable condition
//! - [`TrackingRelation`] - Local branch to configured upstream mapping
//!
//! # Examples
//!
//! ```
//! use gitfleet::core::types::{BranchRef, Oid, RefName, RefTarget};
//!
//! let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
//! let main = BranchRef::local(RefName::new("refs/heads/main").unwrap(), RefTarget::Commit(oid));
//! assert_eq!(main.name().shorthand(), "main");
//! assert!(main.commit().is_some());
//!
//! assert!(Oid::new("not-a-sha").is_err());
//! assert!(RefName::new("refs/heads/bad..name").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid ref name: {0}")]
    InvalidRefName(String),
}

/// A Git object identifier.
///
/// Stored as lowercase hex. Both SHA-1 (40 chars) and SHA-256 (64 chars)
/// object formats are accepted.
///
/// ```
/// use gitfleet::core::types::Oid;
///
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id, normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a 40 or 64
    /// character hex string.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(Self(oid))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Namespace prefix for local branches.
pub const LOCAL_PREFIX: &str = "refs/heads/";

/// Namespace prefix for remote-tracking branches.
pub const REMOTE_PREFIX: &str = "refs/remotes/";

/// A validated, fully qualified Git reference name.
///
/// Branches are always carried by their full name (`refs/heads/main`,
/// `refs/remotes/origin/main`) so that a configured upstream can be compared
/// against an enumerated remote-tracking branch by plain equality.
///
/// ```
/// use gitfleet::core::types::RefName;
///
/// let remote = RefName::new("refs/remotes/origin/main").unwrap();
/// assert!(remote.is_remote_tracking());
/// assert_eq!(remote.shorthand(), "origin/main");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RefName(String);

impl RefName {
    /// Create a new validated ref name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRefName` if the name violates Git's refname
    /// rules (see `git check-ref-format`).
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Ref name for a local branch (`refs/heads/<branch>`).
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRefName` if the resulting name is invalid.
    pub fn local(branch: &str) -> Result<Self, TypeError> {
        Self::new(format!("{LOCAL_PREFIX}{branch}"))
    }

    /// Ref name for a remote-tracking branch (`refs/remotes/<remote>/<branch>`).
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRefName` if the resulting name is invalid.
    pub fn remote(remote: &str, branch: &str) -> Result<Self, TypeError> {
        Self::new(format!("{REMOTE_PREFIX}{remote}/{branch}"))
    }

    pub fn is_remote_tracking(&self) -> bool {
        self.0.starts_with(REMOTE_PREFIX)
    }

    /// The name with its branch namespace stripped (`main`, `origin/main`).
    ///
    /// Names outside the branch namespaces are returned unchanged.
    pub fn shorthand(&self) -> &str {
        self.0
            .strip_prefix(LOCAL_PREFIX)
            .or_else(|| self.0.strip_prefix(REMOTE_PREFIX))
            .unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        let fail = |msg: &str| Err(TypeError::InvalidRefName(format!("'{name}': {msg}")));

        if name.is_empty() {
            return fail("cannot be empty");
        }
        if name.starts_with('/') || name.ends_with('/') {
            return fail("cannot start or end with '/'");
        }
        if name.ends_with('.') {
            return fail("cannot end with '.'");
        }
        for bad in ["..", "@{", "//"] {
            if name.contains(bad) {
                return fail(&format!("cannot contain '{bad}'"));
            }
        }
        const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return fail(&format!("cannot contain '{c}'"));
        }
        if name.chars().any(|c| c.is_ascii_control()) {
            return fail("cannot contain control characters");
        }
        if name
            .split('/')
            .any(|component| component.starts_with('.') || component.ends_with(".lock"))
        {
            return fail("path component cannot start with '.' or end with '.lock'");
        }
        Ok(())
    }
}

impl TryFrom<String> for RefName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RefName> for String {
    fn from(name: RefName) -> Self {
        name.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a branch ref points at.
///
/// A ref whose target cannot be peeled to a commit (dangling symbolic ref,
/// missing object, corrupt pack) is carried as `Unresolved` rather than
/// dropped, so callers can report it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefTarget {
    Commit(Oid),
    Unresolved,
}

/// A branch as seen by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BranchRef {
    /// A branch under `refs/heads/`.
    Local { name: RefName, target: RefTarget },
    /// A branch under `refs/remotes/`.
    RemoteTracking { name: RefName, target: RefTarget },
}

impl BranchRef {
    pub fn local(name: RefName, target: RefTarget) -> Self {
        BranchRef::Local { name, target }
    }

    pub fn remote_tracking(name: RefName, target: RefTarget) -> Self {
        BranchRef::RemoteTracking { name, target }
    }

    pub fn name(&self) -> &RefName {
        match self {
            BranchRef::Local { name, .. } | BranchRef::RemoteTracking { name, .. } => name,
        }
    }

    pub fn target(&self) -> &RefTarget {
        match self {
            BranchRef::Local { target, .. } | BranchRef::RemoteTracking { target, .. } => target,
        }
    }

    /// The commit this branch points at, if it resolved.
    pub fn commit(&self) -> Option<&Oid> {
        match self.target() {
            RefTarget::Commit(oid) => Some(oid),
            RefTarget::Unresolved => None,
        }
    }
}

impl std::fmt::Display for BranchRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The configured upstream of a local branch.
///
/// `upstream` is `None` when the branch tracks nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingRelation {
    pub local: RefName,
    pub upstream: Option<RefName>,
}

impl TrackingRelation {
    /// Whether `remote` is the configured upstream of this branch.
    pub fn is_tracked_by(&self, remote: &RefName) -> bool {
        self.upstream.as_ref() == Some(remote)
    }
}
