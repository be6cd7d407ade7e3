//! Catalog structure tree
//!
//! The fully assembled Branch → Program → Year → Semester → Subject tree
//! returned by `GET /catalog/structure`. Each level carries its children
//! sorted by natural key; an empty level is an empty vector, never an error.

use serde::{Deserialize, Serialize};

/// The whole catalog, branches sorted by code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStructure {
    pub branches: Vec<BranchNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchNode {
    pub branch_id: String,
    pub code: String,
    pub name: String,
    pub programs: Vec<ProgramNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramNode {
    pub program_id: String,
    pub name: String,
    pub duration_years: u8,
    pub years: Vec<YearNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearNode {
    pub year_id: String,
    pub year_number: u8,
    pub semesters: Vec<SemesterNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterNode {
    pub semester_id: String,
    pub semester_number: u8,
    pub subjects: Vec<SubjectLeaf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectLeaf {
    pub subject_id: String,
    pub code: String,
    pub name: String,
    pub credits: u8,
}
