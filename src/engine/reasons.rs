//! engine::reasons
//!
//! Typed reasons why an object is outdated.
//!
//! Every firing rule yields one of these values. Besides serving as a
//! diagnostic, each reason scopes which output properties must be
//! recomputed: a changed attribute map need not re-route an item whose
//! path never depended on it.

/// The output properties a reason can invalidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffectedProps {
    /// The object's raw content.
    pub raw_content: bool,
    /// The object's attribute map.
    pub attributes: bool,
    /// The compiled (filtered/laid-out) content.
    pub compiled_content: bool,
    /// The output path the object is routed to.
    pub path: bool,
}

impl AffectedProps {
    /// Every property.
    pub const ALL: Self = Self {
        raw_content: true,
        attributes: true,
        compiled_content: true,
        path: true,
    };

    /// Only the compiled content.
    pub const COMPILED_CONTENT: Self = Self {
        raw_content: false,
        attributes: false,
        compiled_content: true,
        path: false,
    };

    /// Whether any property is affected.
    pub fn any(&self) -> bool {
        self.raw_content || self.attributes || self.compiled_content || self.path
    }
}

/// Why an object must be recompiled.
///
/// The checker reports the first firing rule's reason; absence of a reason
/// means "up to date".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutdatednessReason {
    /// The site configuration changed since the last run.
    ConfigurationModified,
    /// The object's own content or attributes changed.
    ContentModified,
    /// The compilation rule governing the object changed.
    RulesModified,
    /// An object this object depends on is itself outdated.
    DependenciesOutdated,
    /// The expected output artifact does not exist on disk.
    NotWritten,
}

impl OutdatednessReason {
    /// The output properties this reason invalidates.
    pub fn affects(&self) -> AffectedProps {
        match self {
            // A configuration change can alter anything.
            OutdatednessReason::ConfigurationModified => AffectedProps::ALL,
            OutdatednessReason::ContentModified => AffectedProps::ALL,
            OutdatednessReason::RulesModified => AffectedProps::ALL,
            OutdatednessReason::DependenciesOutdated => AffectedProps::COMPILED_CONTENT,
            OutdatednessReason::NotWritten => AffectedProps::COMPILED_CONTENT,
        }
    }

    /// A human-readable description for diagnostics.
    pub fn message(&self) -> &'static str {
        match self {
            OutdatednessReason::ConfigurationModified => {
                "the site configuration has been modified"
            }
            OutdatednessReason::ContentModified => "the content or attributes have been modified",
            OutdatednessReason::RulesModified => "the compilation rule has been modified",
            OutdatednessReason::DependenciesOutdated => "a dependency is outdated",
            OutdatednessReason::NotWritten => "the output file has not been written yet",
        }
    }
}

impl std::fmt::Display for OutdatednessReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}
