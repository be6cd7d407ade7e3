//! SurrealDB schema for Study Vault
//!
//! Tables stay schemaless (timestamps travel as RFC3339 strings); the parts
//! that matter are the UNIQUE indexes backing every natural key and the
//! full-text index behind resource search.

/// Complete schema, applied once at startup. Idempotent by OVERWRITE.
pub const VAULT_SCHEMA: &str = r#"
-- ============================================
-- Catalog hierarchy
-- ============================================
DEFINE TABLE OVERWRITE branch SCHEMALESS;
DEFINE INDEX OVERWRITE idx_branch_id ON branch FIELDS branch_id UNIQUE;
DEFINE INDEX OVERWRITE idx_branch_code ON branch FIELDS code UNIQUE;

DEFINE TABLE OVERWRITE program SCHEMALESS;
DEFINE INDEX OVERWRITE idx_program_id ON program FIELDS program_id UNIQUE;
DEFINE INDEX OVERWRITE idx_program_branch ON program FIELDS branch_id;

DEFINE TABLE OVERWRITE year SCHEMALESS;
DEFINE INDEX OVERWRITE idx_year_id ON year FIELDS year_id UNIQUE;
DEFINE INDEX OVERWRITE idx_year_program ON year FIELDS program_id;

DEFINE TABLE OVERWRITE semester SCHEMALESS;
DEFINE INDEX OVERWRITE idx_semester_id ON semester FIELDS semester_id UNIQUE;
DEFINE INDEX OVERWRITE idx_semester_year ON semester FIELDS year_id;
DEFINE INDEX OVERWRITE idx_semester_number ON semester FIELDS semester_number;

DEFINE TABLE OVERWRITE subject SCHEMALESS;
DEFINE INDEX OVERWRITE idx_subject_id ON subject FIELDS subject_id UNIQUE;
DEFINE INDEX OVERWRITE idx_subject_code ON subject FIELDS code UNIQUE;
DEFINE INDEX OVERWRITE idx_subject_branch ON subject FIELDS branch_id;
DEFINE INDEX OVERWRITE idx_subject_semester ON subject FIELDS semester_id;

-- ============================================
-- Resources
-- ============================================
DEFINE TABLE OVERWRITE resource SCHEMALESS;
DEFINE INDEX OVERWRITE idx_resource_id ON resource FIELDS resource_id UNIQUE;
DEFINE INDEX OVERWRITE idx_resource_subject ON resource FIELDS subject_id;
DEFINE INDEX OVERWRITE idx_resource_approved ON resource FIELDS is_approved;
DEFINE ANALYZER OVERWRITE resource_text TOKENIZERS class FILTERS lowercase, ascii;
DEFINE INDEX OVERWRITE idx_resource_search ON resource
    FIELDS title, description, tags
    SEARCH ANALYZER resource_text BM25;

-- ============================================
-- Ratings (one per resource/user pair)
-- ============================================
DEFINE TABLE OVERWRITE rating SCHEMALESS;
DEFINE INDEX OVERWRITE idx_rating_id ON rating FIELDS rating_id UNIQUE;
DEFINE INDEX OVERWRITE idx_rating_pair ON rating FIELDS resource_id, user_id UNIQUE;
DEFINE INDEX OVERWRITE idx_rating_resource ON rating FIELDS resource_id;

-- ============================================
-- Roadmaps
-- ============================================
DEFINE TABLE OVERWRITE roadmap SCHEMALESS;
DEFINE INDEX OVERWRITE idx_roadmap_id ON roadmap FIELDS roadmap_id UNIQUE;
DEFINE INDEX OVERWRITE idx_roadmap_subject ON roadmap FIELDS subject_id;

-- ============================================
-- Users
-- ============================================
DEFINE TABLE OVERWRITE user SCHEMALESS;
DEFINE INDEX OVERWRITE idx_user_id ON user FIELDS user_id UNIQUE;
DEFINE INDEX OVERWRITE idx_user_username ON user FIELDS username UNIQUE;
DEFINE INDEX OVERWRITE idx_user_email ON user FIELDS email UNIQUE;
DEFINE INDEX OVERWRITE idx_user_verify ON user FIELDS verification_token;
"#;
