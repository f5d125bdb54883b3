//! # Course Section Documents
//!
//! The shape of a converted course section as kept by the section store.
//! Field names follow the camelCase JSON of the stored documents.

use serde::{Deserialize, Serialize};

/// One course section together with the course it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedSection {
    pub course_info: CourseInfo,
    pub section: Section,
}

/// Course-level information shared by all sections of a course
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInfo {
    /// Quarter in yyyyq format
    pub quarter: String,
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub general_education: Vec<GeneralEducation>,
}

/// A general education area satisfied by the course
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralEducation {
    pub ge_code: String,
    #[serde(default)]
    pub ge_college: Option<String>,
}

/// Section-level enrollment and scheduling information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub enroll_code: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub session: Option<String>,
    /// "Y" when the class is closed to enrollment
    #[serde(default)]
    pub class_closed: Option<String>,
    /// "Y" when the course has been cancelled
    #[serde(default)]
    pub course_cancelled: Option<String>,
    #[serde(default)]
    pub enrolled_total: Option<u32>,
    #[serde(default)]
    pub max_enroll: Option<u32>,
    #[serde(default)]
    pub time_locations: Vec<TimeLocation>,
    #[serde(default)]
    pub instructors: Vec<Instructor>,
}

impl Section {
    pub fn is_cancelled(&self) -> bool {
        flag_set(&self.course_cancelled)
    }

    pub fn is_closed(&self) -> bool {
        flag_set(&self.class_closed)
    }
}

fn flag_set(flag: &Option<String>) -> bool {
    matches!(flag.as_deref().map(str::trim), Some("Y") | Some("y"))
}

/// A meeting time and place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeLocation {
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub days: Option<String>,
    #[serde(default)]
    pub begin_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    pub instructor: String,
    #[serde(default)]
    pub function_code: Option<String>,
}
