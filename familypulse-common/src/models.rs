//! Survey record model
//!
//! Shapes shared by every FamilyPulse component: the family-member record
//! collected by the survey form, the partial record produced by Smart Fill,
//! and the survey metadata passed through untouched.
//!
//! Wire format is camelCase JSON (`serialNo`, `parentSpouseName`, ...) so the
//! browser view can bind fields directly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::uuid_utils;

/// Literal health value meaning "no known issues" (compared case-insensitively)
pub const NO_HEALTH_ISSUES: &str = "None";

/// Upper bound (inclusive) for a member's age
pub const MAX_AGE: u8 = 120;

/// Sex of a family member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    /// Every value, in the order offered to the external service
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marital status of a family member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
    Widowed,
    Divorced,
    Separated,
}

impl MaritalStatus {
    pub const ALL: [MaritalStatus; 5] = [
        MaritalStatus::Single,
        MaritalStatus::Married,
        MaritalStatus::Widowed,
        MaritalStatus::Divorced,
        MaritalStatus::Separated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaritalStatus::Single => "Single",
            MaritalStatus::Married => "Married",
            MaritalStatus::Widowed => "Widowed",
            MaritalStatus::Divorced => "Divorced",
            MaritalStatus::Separated => "Separated",
        }
    }
}

impl fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque member identifier
///
/// Minted once when a record is created and never reused. Serial numbers
/// change on deletion; this does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn generate() -> Self {
        Self(uuid_utils::generate())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for MemberId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for MemberId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid_utils::parse(s).map(Self)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One family member as collected by the survey form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub id: MemberId,
    /// 1-based display position within the collection (not identity)
    pub serial_no: u32,
    pub name: String,
    /// Husband or father name
    pub parent_spouse_name: String,
    pub relation_with_head: String,
    pub sex: Gender,
    pub age: u8,
    pub marital_status: MaritalStatus,
    pub health_problems: String,
}

impl MemberRecord {
    /// Copy of this record at a new display position; id and fields preserved
    pub fn with_serial_no(self, serial_no: u32) -> Self {
        Self { serial_no, ..self }
    }

    /// Whether `health_problems` describes an actual issue
    pub fn has_health_problems(&self) -> bool {
        !is_no_health_issue(&self.health_problems)
    }
}

/// Whether a health-problems value means "no known issues"
///
/// Matches the `None` sentinel in any letter case. Blank text counts as
/// no issues too.
pub fn is_no_health_issue(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_HEALTH_ISSUES)
}

/// Fresh draft for the next entry, with form defaults
///
/// The id is minted here so a merged draft carries its identity into the
/// collection unchanged.
pub fn create_draft_record(next_serial_no: u32) -> MemberRecord {
    MemberRecord {
        id: MemberId::generate(),
        serial_no: next_serial_no,
        name: String::new(),
        parent_spouse_name: String::new(),
        relation_with_head: String::new(),
        sex: Gender::default(),
        age: 0,
        marital_status: MaritalStatus::default(),
        health_problems: NO_HEALTH_ISSUES.to_string(),
    }
}

/// Member fields recognized in free text; absent means "not mentioned"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialMemberRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_spouse_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_with_head: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<MaritalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_problems: Option<String>,
}

impl PartialMemberRecord {
    /// Number of fields present
    pub fn field_count(&self) -> usize {
        [
            self.name.is_some(),
            self.parent_spouse_name.is_some(),
            self.relation_with_head.is_some(),
            self.sex.is_some(),
            self.age.is_some(),
            self.marital_status.is_some(),
            self.health_problems.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }
}

/// Overlay the present fields of `partial` onto `draft`
///
/// Absent fields keep the draft's value; `id` and `serial_no` are never
/// touched.
pub fn merge_partial(draft: MemberRecord, partial: &PartialMemberRecord) -> MemberRecord {
    MemberRecord {
        name: partial.name.clone().unwrap_or(draft.name),
        parent_spouse_name: partial
            .parent_spouse_name
            .clone()
            .unwrap_or(draft.parent_spouse_name),
        relation_with_head: partial
            .relation_with_head
            .clone()
            .unwrap_or(draft.relation_with_head),
        sex: partial.sex.unwrap_or(draft.sex),
        age: partial.age.unwrap_or(draft.age),
        marital_status: partial.marital_status.unwrap_or(draft.marital_status),
        health_problems: partial
            .health_problems
            .clone()
            .unwrap_or(draft.health_problems),
        ..draft
    }
}

/// Survey header owned by the caller; never read or validated by the core
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyMetadata {
    pub head_of_family: String,
    pub address: String,
    pub survey_date: String,
}

impl SurveyMetadata {
    /// Empty header dated today (local time, `YYYY-MM-DD`)
    pub fn starting_today() -> Self {
        Self {
            survey_date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }
}
