//! Catalog repository
//!
//! CRUD for the five catalog levels plus the lookups the resource filter
//! composer needs (branch by code, semesters by number, subject-id sets).

use serde::Deserialize;

use crate::datastore::Db;
use crate::entities::{BranchEntity, ProgramEntity, SemesterEntity, SubjectEntity, YearEntity};
use crate::error::map_db_error;
use vault_core::VaultResult;

#[derive(Clone)]
pub struct CatalogRepo {
    db: Db,
}

impl CatalogRepo {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    // ---- branches ----

    pub async fn create_branch(&self, entity: &BranchEntity) -> VaultResult<BranchEntity> {
        self.db
            .query(format!("CREATE {} CONTENT $data RETURN NONE", BranchEntity::TABLE))
            .bind(("data", entity.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(entity.clone())
    }

    pub async fn branches(&self) -> VaultResult<Vec<BranchEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM branch ORDER BY code ASC")
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn branch_by_id(&self, branch_id: &str) -> VaultResult<Option<BranchEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM branch WHERE branch_id = $branch_id LIMIT 1")
            .bind(("branch_id", branch_id.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn branch_by_code(&self, code: &str) -> VaultResult<Option<BranchEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM branch WHERE code = $code LIMIT 1")
            .bind(("code", code.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn update_branch(&self, entity: &BranchEntity) -> VaultResult<()> {
        self.db
            .query("UPDATE branch CONTENT $data WHERE branch_id = $branch_id RETURN NONE")
            .bind(("data", entity.clone()))
            .bind(("branch_id", entity.branch_id.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    pub async fn delete_branch(&self, branch_id: &str) -> VaultResult<()> {
        self.db
            .query("DELETE branch WHERE branch_id = $branch_id")
            .bind(("branch_id", branch_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    // ---- programs ----

    pub async fn create_program(&self, entity: &ProgramEntity) -> VaultResult<ProgramEntity> {
        self.db
            .query(format!("CREATE {} CONTENT $data RETURN NONE", ProgramEntity::TABLE))
            .bind(("data", entity.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(entity.clone())
    }

    pub async fn programs(&self) -> VaultResult<Vec<ProgramEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM program ORDER BY name ASC")
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn programs_of(&self, branch_id: &str) -> VaultResult<Vec<ProgramEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM program WHERE branch_id = $branch_id ORDER BY name ASC")
            .bind(("branch_id", branch_id.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn program_by_id(&self, program_id: &str) -> VaultResult<Option<ProgramEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM program WHERE program_id = $program_id LIMIT 1")
            .bind(("program_id", program_id.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn update_program(&self, entity: &ProgramEntity) -> VaultResult<()> {
        self.db
            .query("UPDATE program CONTENT $data WHERE program_id = $program_id RETURN NONE")
            .bind(("data", entity.clone()))
            .bind(("program_id", entity.program_id.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    pub async fn delete_program(&self, program_id: &str) -> VaultResult<()> {
        self.db
            .query("DELETE program WHERE program_id = $program_id")
            .bind(("program_id", program_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    // ---- years ----

    pub async fn create_year(&self, entity: &YearEntity) -> VaultResult<YearEntity> {
        self.db
            .query(format!("CREATE {} CONTENT $data RETURN NONE", YearEntity::TABLE))
            .bind(("data", entity.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(entity.clone())
    }

    pub async fn years(&self) -> VaultResult<Vec<YearEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM year ORDER BY year_number ASC")
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn years_of(&self, program_id: &str) -> VaultResult<Vec<YearEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM year WHERE program_id = $program_id ORDER BY year_number ASC")
            .bind(("program_id", program_id.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn year_by_id(&self, year_id: &str) -> VaultResult<Option<YearEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM year WHERE year_id = $year_id LIMIT 1")
            .bind(("year_id", year_id.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn update_year(&self, entity: &YearEntity) -> VaultResult<()> {
        self.db
            .query("UPDATE year CONTENT $data WHERE year_id = $year_id RETURN NONE")
            .bind(("data", entity.clone()))
            .bind(("year_id", entity.year_id.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    pub async fn delete_year(&self, year_id: &str) -> VaultResult<()> {
        self.db
            .query("DELETE year WHERE year_id = $year_id")
            .bind(("year_id", year_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    // ---- semesters ----

    pub async fn create_semester(&self, entity: &SemesterEntity) -> VaultResult<SemesterEntity> {
        self.db
            .query(format!("CREATE {} CONTENT $data RETURN NONE", SemesterEntity::TABLE))
            .bind(("data", entity.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(entity.clone())
    }

    pub async fn semesters(&self) -> VaultResult<Vec<SemesterEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM semester ORDER BY semester_number ASC")
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn semesters_of(&self, year_id: &str) -> VaultResult<Vec<SemesterEntity>> {
        let mut response = self
            .db
            .query(
                "SELECT * OMIT id FROM semester WHERE year_id = $year_id ORDER BY semester_number ASC",
            )
            .bind(("year_id", year_id.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn semester_by_id(&self, semester_id: &str) -> VaultResult<Option<SemesterEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM semester WHERE semester_id = $semester_id LIMIT 1")
            .bind(("semester_id", semester_id.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    /// All semester rows with the given number, across years. A semester
    /// number is not unique; every match participates in filtering.
    pub async fn semesters_by_number(&self, number: u8) -> VaultResult<Vec<SemesterEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM semester WHERE semester_number = $number")
            .bind(("number", number))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn update_semester(&self, entity: &SemesterEntity) -> VaultResult<()> {
        self.db
            .query("UPDATE semester CONTENT $data WHERE semester_id = $semester_id RETURN NONE")
            .bind(("data", entity.clone()))
            .bind(("semester_id", entity.semester_id.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    pub async fn delete_semester(&self, semester_id: &str) -> VaultResult<()> {
        self.db
            .query("DELETE semester WHERE semester_id = $semester_id")
            .bind(("semester_id", semester_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    // ---- subjects ----

    pub async fn create_subject(&self, entity: &SubjectEntity) -> VaultResult<SubjectEntity> {
        self.db
            .query(format!("CREATE {} CONTENT $data RETURN NONE", SubjectEntity::TABLE))
            .bind(("data", entity.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(entity.clone())
    }

    pub async fn subjects(&self) -> VaultResult<Vec<SubjectEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM subject ORDER BY code ASC")
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn subjects_of(&self, semester_id: &str) -> VaultResult<Vec<SubjectEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM subject WHERE semester_id = $semester_id ORDER BY code ASC")
            .bind(("semester_id", semester_id.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn subject_by_id(&self, subject_id: &str) -> VaultResult<Option<SubjectEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM subject WHERE subject_id = $subject_id LIMIT 1")
            .bind(("subject_id", subject_id.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn subject_by_code(&self, code: &str) -> VaultResult<Option<SubjectEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM subject WHERE code = $code LIMIT 1")
            .bind(("code", code.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    /// Subject ids restricted by branch and/or semester membership. At
    /// least one restriction must be present; the composer never calls this
    /// unrestricted.
    pub async fn subject_ids_matching(
        &self,
        branch_id: Option<String>,
        semester_ids: Option<Vec<String>>,
    ) -> VaultResult<Vec<String>> {
        let mut conds = Vec::new();
        if branch_id.is_some() {
            conds.push("branch_id = $branch_id");
        }
        if semester_ids.is_some() {
            conds.push("semester_id IN $semester_ids");
        }
        debug_assert!(!conds.is_empty());

        let query = format!("SELECT subject_id FROM subject WHERE {}", conds.join(" AND "));
        let mut response = self
            .db
            .query(query)
            .bind(("branch_id", branch_id.unwrap_or_default()))
            .bind(("semester_ids", semester_ids.unwrap_or_default()))
            .await
            .map_err(map_db_error)?;

        #[derive(Deserialize)]
        struct Row {
            subject_id: String,
        }
        let rows: Vec<Row> = response.take(0).map_err(map_db_error)?;
        Ok(rows.into_iter().map(|r| r.subject_id).collect())
    }

    pub async fn update_subject(&self, entity: &SubjectEntity) -> VaultResult<()> {
        self.db
            .query("UPDATE subject CONTENT $data WHERE subject_id = $subject_id RETURN NONE")
            .bind(("data", entity.clone()))
            .bind(("subject_id", entity.subject_id.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    pub async fn delete_subject(&self, subject_id: &str) -> VaultResult<()> {
        self.db
            .query("DELETE subject WHERE subject_id = $subject_id")
            .bind(("subject_id", subject_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }
}
