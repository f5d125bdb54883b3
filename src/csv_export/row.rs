//! # Row Projection
//!
//! Reduces a section document to a flat row in `SECTION_SCHEMA` order.

use crate::sections::{ConvertedSection, GeneralEducation, Section, TimeLocation};

use super::schema::{ExportSchema, SECTION_SCHEMA};

/// A row of string fields in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatRow {
    fields: Vec<String>,
}

impl FlatRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for FlatRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// The schema `project` produces rows for
pub fn schema() -> &'static ExportSchema {
    &SECTION_SCHEMA
}

/// Project one section document onto the export columns
pub fn project(doc: &ConvertedSection) -> FlatRow {
    let info = &doc.course_info;
    let section = &doc.section;

    FlatRow::new(vec![
        info.quarter.clone(),
        info.course_id.trim().to_string(),
        info.title.trim().to_string(),
        section.enroll_code.clone(),
        section.section.clone(),
        status(section).to_string(),
        optional_count(section.enrolled_total),
        optional_count(section.max_enroll),
        section
            .instructors
            .iter()
            .map(|i| i.instructor.trim())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        section
            .time_locations
            .iter()
            .map(meeting)
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        info.general_education
            .iter()
            .map(ge_area)
            .collect::<Vec<_>>()
            .join(", "),
    ])
}

fn status(section: &Section) -> &'static str {
    if section.is_cancelled() {
        return "CANCELLED";
    }
    if section.is_closed() {
        return "CLOSED";
    }
    match (section.enrolled_total, section.max_enroll) {
        (Some(enrolled), Some(max)) if enrolled >= max => "FULL",
        _ => "OPEN",
    }
}

fn optional_count(count: Option<u32>) -> String {
    count.map(|c| c.to_string()).unwrap_or_default()
}

fn meeting(tl: &TimeLocation) -> String {
    let times = match (tl.begin_time.as_deref(), tl.end_time.as_deref()) {
        (Some(begin), Some(end)) => Some(format!("{}-{}", begin.trim(), end.trim())),
        (Some(begin), None) => Some(begin.trim().to_string()),
        _ => None,
    };

    // UCSB day strings are space padded ("M W    "); collapse them
    let days = tl
        .days
        .as_deref()
        .map(|d| d.split_whitespace().collect::<Vec<_>>().join(" "));

    [days, times, tl.building.clone(), tl.room.clone()]
        .into_iter()
        .flatten()
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn ge_area(ge: &GeneralEducation) -> String {
    let code = ge.ge_code.trim();
    match ge.ge_college.as_deref().map(str::trim) {
        Some(college) if !college.is_empty() => format!("{} ({})", code, college),
        _ => code.to_string(),
    }
}
