//! # Sections
//!
//! Course section documents and the store they are looked up in.

pub mod errors;
pub mod store;
pub mod types;

pub use errors::{StoreError, StoreResult};
pub use store::{validate_quarter, JsonFileSectionStore, MemorySectionStore, SectionStore};
pub use types::{ConvertedSection, CourseInfo, GeneralEducation, Instructor, Section, TimeLocation};
