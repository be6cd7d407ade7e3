//! Catalog hierarchy entities
//!
//! Parent references are plain id fields; referential integrity is checked
//! at write time where it matters and dangling references are tolerated on
//! read (the structure assembly drops orphans).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchEntity {
    pub branch_id: String,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl BranchEntity {
    pub const TABLE: &'static str = "branch";

    pub fn new(code: String, name: String) -> Self {
        Self {
            branch_id: new_id("brn"),
            code,
            name,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramEntity {
    pub program_id: String,
    pub branch_id: String,
    pub name: String,
    pub duration_years: u8,
    pub created_at: DateTime<Utc>,
}

impl ProgramEntity {
    pub const TABLE: &'static str = "program";

    pub fn new(branch_id: String, name: String, duration_years: u8) -> Self {
        Self {
            program_id: new_id("prg"),
            branch_id,
            name,
            duration_years,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearEntity {
    pub year_id: String,
    pub program_id: String,
    pub year_number: u8,
    pub created_at: DateTime<Utc>,
}

impl YearEntity {
    pub const TABLE: &'static str = "year";

    pub fn new(program_id: String, year_number: u8) -> Self {
        Self {
            year_id: new_id("yr"),
            program_id,
            year_number,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemesterEntity {
    pub semester_id: String,
    pub year_id: String,
    pub semester_number: u8,
    pub created_at: DateTime<Utc>,
}

impl SemesterEntity {
    pub const TABLE: &'static str = "semester";

    pub fn new(year_id: String, semester_number: u8) -> Self {
        Self {
            semester_id: new_id("sem"),
            year_id,
            semester_number,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectEntity {
    pub subject_id: String,
    pub code: String,
    pub name: String,
    pub branch_id: String,
    pub semester_id: String,
    pub credits: u8,
    pub topics: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl SubjectEntity {
    pub const TABLE: &'static str = "subject";

    pub fn new(
        code: String,
        name: String,
        branch_id: String,
        semester_id: String,
        credits: u8,
        topics: Vec<String>,
    ) -> Self {
        Self {
            subject_id: new_id("sub"),
            code,
            name,
            branch_id,
            semester_id,
            credits,
            topics,
            created_at: Utc::now(),
        }
    }
}
