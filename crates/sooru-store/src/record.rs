// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use sooru_core::{FloorPlanId, ProjectId, UserId};
use sooru_model::{FloorPlan, Project, User};

use crate::{StoreError, StoreErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKind {
    User,
    Project,
    FloorPlan,
}

impl RecordKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Project => "project",
            Self::FloorPlan => "floorplan",
        }
    }

    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::User => "usr",
            Self::Project => "prj",
            Self::FloorPlan => "fp",
        }
    }

    /// Users and projects carry a human-facing code such as `KIT001`.
    #[must_use]
    pub const fn has_code(self) -> bool {
        matches!(self, Self::User | Self::Project)
    }

    #[must_use]
    pub fn format_id(self, seq: u64) -> String {
        format!("{}-{seq:06}", self.id_prefix())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "lowercase")]
pub enum Record {
    User(User),
    Project(Project),
    FloorPlan(FloorPlan),
}

/// Equality filters applied by [`crate::RecordStore::list`]. Unset fields match
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub owner: Option<UserId>,
    pub project_id: Option<ProjectId>,
    pub email: Option<String>,
}

impl RecordFilter {
    #[must_use]
    pub fn owned_by(owner: &UserId) -> Self {
        Self {
            owner: Some(owner.clone()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn in_project(mut self, project_id: &ProjectId) -> Self {
        self.project_id = Some(project_id.clone());
        self
    }

    #[must_use]
    pub fn with_email(email: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            ..Self::default()
        }
    }
}

impl Record {
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::User(_) => RecordKind::User,
            Self::Project(_) => RecordKind::Project,
            Self::FloorPlan(_) => RecordKind::FloorPlan,
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::User(u) => u.id.as_ref().map(UserId::as_str),
            Self::Project(p) => p.id.as_ref().map(ProjectId::as_str),
            Self::FloorPlan(f) => f.id.as_ref().map(FloorPlanId::as_str),
        }
    }

    #[must_use]
    pub const fn version(&self) -> u64 {
        match self {
            Self::User(u) => u.version,
            Self::Project(p) => p.version,
            Self::FloorPlan(f) => f.version,
        }
    }

    #[must_use]
    pub const fn created_at_ms(&self) -> u64 {
        match self {
            Self::User(u) => u.created_at_ms,
            Self::Project(p) => p.created_at_ms,
            Self::FloorPlan(f) => f.created_at_ms,
        }
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::User(u) => Some(u.code.as_str()),
            Self::Project(p) => Some(p.code.as_str()),
            Self::FloorPlan(_) => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::User(u) => &u.name,
            Self::Project(p) => &p.name,
            Self::FloorPlan(f) => &f.name,
        }
    }

    #[must_use]
    pub fn owner(&self) -> Option<&UserId> {
        match self {
            Self::User(_) => None,
            Self::Project(p) => Some(&p.owner),
            Self::FloorPlan(f) => Some(&f.created_by),
        }
    }

    #[must_use]
    pub fn project_id(&self) -> Option<&ProjectId> {
        match self {
            Self::FloorPlan(f) => Some(&f.project_id),
            Self::User(_) | Self::Project(_) => None,
        }
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::User(u) => Some(u.email.as_str()),
            Self::Project(_) | Self::FloorPlan(_) => None,
        }
    }

    #[must_use]
    pub fn matches(&self, filter: &RecordFilter) -> bool {
        let owner_ok = filter.owner.as_ref().map_or(true, |o| self.owner() == Some(o));
        let project_ok = filter
            .project_id
            .as_ref()
            .map_or(true, |p| self.project_id() == Some(p));
        let email_ok = filter
            .email
            .as_deref()
            .map_or(true, |e| self.email() == Some(e));
        owner_ok && project_ok && email_ok
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        match self {
            Self::User(u) => sooru_model::validate_name("name", &u.name)?,
            Self::Project(p) => p.validate()?,
            Self::FloorPlan(f) => f.validate()?,
        }
        Ok(())
    }

    /// Give an unsaved record its id and, for users and projects, its code.
    pub(crate) fn assign_identity(&mut self, id: String, code: Option<String>) -> Result<(), StoreError> {
        let bad_id = |e: sooru_core::Error| StoreError::new(StoreErrorCode::Internal, e.to_string());
        match self {
            Self::User(u) => {
                u.id = Some(UserId::new(id).map_err(bad_id)?);
                u.code = code.unwrap_or_default();
            }
            Self::Project(p) => {
                p.id = Some(ProjectId::new(id).map_err(bad_id)?);
                p.code = code.unwrap_or_default();
            }
            Self::FloorPlan(f) => f.id = Some(FloorPlanId::new(id).map_err(bad_id)?),
        }
        Ok(())
    }

    /// Stamp a write: first-save timestamp, update timestamp and version bump.
    pub(crate) fn touch(&mut self, now_ms: u64) {
        let (created, updated, version) = match self {
            Self::User(u) => (&mut u.created_at_ms, &mut u.updated_at_ms, &mut u.version),
            Self::Project(p) => (&mut p.created_at_ms, &mut p.updated_at_ms, &mut p.version),
            Self::FloorPlan(f) => (&mut f.created_at_ms, &mut f.updated_at_ms, &mut f.version),
        };
        if *version == 0 {
            *created = now_ms;
        }
        *updated = now_ms;
        *version += 1;
    }
}

/// Compare-and-swap guard shared by the backends.
pub(crate) fn check_expected_version(
    record: &Record,
    stored_version: Option<u64>,
) -> Result<(), StoreError> {
    let kind = record.kind().as_str();
    match (record.id(), stored_version) {
        (None, _) if record.version() != 0 => Err(StoreError::new(
            StoreErrorCode::Validation,
            format!("unsaved {kind} must have version 0"),
        )),
        (None, _) => Ok(()),
        (Some(id), None) => Err(StoreError::new(
            StoreErrorCode::NotFound,
            format!("{kind} `{id}` not found"),
        )),
        (Some(id), Some(stored)) if stored != record.version() => Err(StoreError::new(
            StoreErrorCode::Conflict,
            format!(
                "{kind} `{id}` was modified concurrently (expected version {}, stored {stored})",
                record.version()
            ),
        )),
        (Some(_), Some(_)) => Ok(()),
    }
}

pub(crate) fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| {
        b.created_at_ms()
            .cmp(&a.created_at_ms())
            .then_with(|| b.id().cmp(&a.id()))
    });
}

/// Conversion between a domain record and the store's tagged [`Record`].
pub trait StoredRecord: Sized {
    const KIND: RecordKind;
    fn into_record(self) -> Record;
    fn from_record(record: Record) -> Result<Self, StoreError>;
}

macro_rules! impl_stored_record {
    ($ty:ident, $variant:ident) => {
        impl StoredRecord for $ty {
            const KIND: RecordKind = RecordKind::$variant;

            fn into_record(self) -> Record {
                Record::$variant(self)
            }

            fn from_record(record: Record) -> Result<Self, StoreError> {
                match record {
                    Record::$variant(value) => Ok(value),
                    other => Err(StoreError::new(
                        StoreErrorCode::Internal,
                        format!(
                            "expected {} record, found {}",
                            RecordKind::$variant.as_str(),
                            other.kind().as_str()
                        ),
                    )),
                }
            }
        }
    };
}

impl_stored_record!(User, User);
impl_stored_record!(Project, Project);
impl_stored_record!(FloorPlan, FloorPlan);
