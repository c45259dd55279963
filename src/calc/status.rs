use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Lifecycle of a project: draft → published → funded → completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Draft,
    Published,
    Funded,
    Completed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Draft,
        ProjectStatus::Published,
        ProjectStatus::Funded,
        ProjectStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Funded => "funded",
            Self::Completed => "completed",
        }
    }

    /// Case-insensitive parse of a submitted literal.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw))
    }

    /// Status of a stored row. Only the exact lowercase literals are recognised;
    /// a missing or any other value reads as draft, matching the SQL filters.
    pub fn from_stored(raw: Option<&str>) -> Self {
        raw.and_then(|raw| Self::ALL.into_iter().find(|status| status.as_str() == raw))
            .unwrap_or(Self::Draft)
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Draft => Some(Self::Published),
            Self::Published => Some(Self::Funded),
            Self::Funded => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    pub fn can_transition_to(&self, to: ProjectStatus) -> bool {
        *self == to || self.next() == Some(to)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    pub from: ProjectStatus,
    pub to: ProjectStatus,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot move a project from {} to {}", self.from, self.to)
    }
}

impl std::error::Error for TransitionError {}

/// Validate a status change. Only single forward steps are allowed; staying put is a no-op.
pub fn transition(from: ProjectStatus, to: ProjectStatus) -> Result<ProjectStatus, TransitionError> {
    if from.can_transition_to(to) {
        Ok(to)
    } else {
        Err(TransitionError { from, to })
    }
}

/// Per-status counts for tab badges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusCounts {
    pub draft: u64,
    pub published: u64,
    pub funded: u64,
    pub completed: u64,
    pub total: u64,
}

impl StatusCounts {
    /// Missing and unrecognised statuses count as draft.
    pub fn tally<'a, I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut counts = Self::default();
        for raw in statuses {
            counts.total += 1;
            match ProjectStatus::from_stored(raw) {
                ProjectStatus::Draft => counts.draft += 1,
                ProjectStatus::Published => counts.published += 1,
                ProjectStatus::Funded => counts.funded += 1,
                ProjectStatus::Completed => counts.completed += 1,
            }
        }
        counts
    }

    pub fn get(&self, status: ProjectStatus) -> u64 {
        match status {
            ProjectStatus::Draft => self.draft,
            ProjectStatus::Published => self.published,
            ProjectStatus::Funded => self.funded,
            ProjectStatus::Completed => self.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PatentStatus {
    Pending,
    Granted,
    Expired,
}

impl PatentStatus {
    pub const ALL: [PatentStatus; 3] = [PatentStatus::Pending, PatentStatus::Granted, PatentStatus::Expired];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Granted => "Granted",
            Self::Expired => "Expired",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for PatentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
