//! Catalog structure assembly
//!
//! Builds the full Branch → Program → Year → Semester → Subject tree in one
//! pass over five bulk reads. Children of a missing parent are dropped
//! (dangling references are tolerated, not fatal) and a level with no
//! children is an empty vector.

use std::collections::HashMap;
use std::sync::Arc;

use vault_core::types::{
    BranchNode, CatalogStructure, ProgramNode, SemesterNode, SubjectLeaf, YearNode,
};
use vault_core::VaultResult;

use crate::entities::{BranchEntity, ProgramEntity, SemesterEntity, SubjectEntity, YearEntity};
use crate::repos::Database;

#[derive(Clone)]
pub struct CatalogService {
    db: Arc<Database>,
}

impl CatalogService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The fully nested catalog, each level sorted by its natural key.
    pub async fn structure(&self) -> VaultResult<CatalogStructure> {
        let branches = self.db.catalog.branches().await?;
        let programs = self.db.catalog.programs().await?;
        let years = self.db.catalog.years().await?;
        let semesters = self.db.catalog.semesters().await?;
        let subjects = self.db.catalog.subjects().await?;
        Ok(assemble(branches, programs, years, semesters, subjects))
    }
}

/// Pure assembly of the catalog tree from flat rows.
pub fn assemble(
    branches: Vec<BranchEntity>,
    programs: Vec<ProgramEntity>,
    years: Vec<YearEntity>,
    semesters: Vec<SemesterEntity>,
    subjects: Vec<SubjectEntity>,
) -> CatalogStructure {
    let mut subjects_by_semester: HashMap<String, Vec<SubjectLeaf>> = HashMap::new();
    for s in subjects {
        subjects_by_semester
            .entry(s.semester_id.clone())
            .or_default()
            .push(SubjectLeaf {
                subject_id: s.subject_id,
                code: s.code,
                name: s.name,
                credits: s.credits,
            });
    }

    let mut semesters_by_year: HashMap<String, Vec<SemesterNode>> = HashMap::new();
    for s in semesters {
        let mut node_subjects = subjects_by_semester.remove(&s.semester_id).unwrap_or_default();
        node_subjects.sort_by(|a, b| a.code.cmp(&b.code));
        semesters_by_year
            .entry(s.year_id.clone())
            .or_default()
            .push(SemesterNode {
                semester_id: s.semester_id,
                semester_number: s.semester_number,
                subjects: node_subjects,
            });
    }

    let mut years_by_program: HashMap<String, Vec<YearNode>> = HashMap::new();
    for y in years {
        let mut node_semesters = semesters_by_year.remove(&y.year_id).unwrap_or_default();
        node_semesters.sort_by_key(|s| s.semester_number);
        years_by_program
            .entry(y.program_id.clone())
            .or_default()
            .push(YearNode {
                year_id: y.year_id,
                year_number: y.year_number,
                semesters: node_semesters,
            });
    }

    let mut programs_by_branch: HashMap<String, Vec<ProgramNode>> = HashMap::new();
    for p in programs {
        let mut node_years = years_by_program.remove(&p.program_id).unwrap_or_default();
        node_years.sort_by_key(|y| y.year_number);
        programs_by_branch
            .entry(p.branch_id.clone())
            .or_default()
            .push(ProgramNode {
                program_id: p.program_id,
                name: p.name,
                duration_years: p.duration_years,
                years: node_years,
            });
    }

    let mut nodes: Vec<BranchNode> = branches
        .into_iter()
        .map(|b| {
            let mut node_programs = programs_by_branch.remove(&b.branch_id).unwrap_or_default();
            node_programs.sort_by(|a, b| a.name.cmp(&b.name));
            BranchNode {
                branch_id: b.branch_id,
                code: b.code,
                name: b.name,
                programs: node_programs,
            }
        })
        .collect();
    nodes.sort_by(|a, b| a.code.cmp(&b.code));

    CatalogStructure { branches: nodes }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(id: &str, code: &str) -> BranchEntity {
        BranchEntity {
            branch_id: id.into(),
            code: code.into(),
            name: code.to_lowercase(),
            created_at: chrono::Utc::now(),
        }
    }

    fn program(id: &str, branch: &str, name: &str) -> ProgramEntity {
        ProgramEntity {
            program_id: id.into(),
            branch_id: branch.into(),
            name: name.into(),
            duration_years: 4,
            created_at: chrono::Utc::now(),
        }
    }

    fn year(id: &str, program: &str, number: u8) -> YearEntity {
        YearEntity {
            year_id: id.into(),
            program_id: program.into(),
            year_number: number,
            created_at: chrono::Utc::now(),
        }
    }

    fn semester(id: &str, year: &str, number: u8) -> SemesterEntity {
        SemesterEntity {
            semester_id: id.into(),
            year_id: year.into(),
            semester_number: number,
            created_at: chrono::Utc::now(),
        }
    }

    fn subject(id: &str, code: &str, branch: &str, sem: &str) -> SubjectEntity {
        SubjectEntity {
            subject_id: id.into(),
            code: code.into(),
            name: code.to_lowercase(),
            branch_id: branch.into(),
            semester_id: sem.into(),
            credits: 4,
            topics: vec![],
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn nests_and_sorts_every_level() {
        let tree = assemble(
            vec![branch("b2", "EE"), branch("b1", "CS")],
            vec![program("p1", "b1", "BTech")],
            vec![year("y2", "p1", 2), year("y1", "p1", 1)],
            vec![semester("s2", "y1", 2), semester("s1", "y1", 1)],
            vec![
                subject("sub2", "CS202", "b1", "s1"),
                subject("sub1", "CS101", "b1", "s1"),
            ],
        );

        let codes: Vec<&str> = tree.branches.iter().map(|b| b.code.as_str()).collect();
        assert_eq!(codes, vec!["CS", "EE"]);

        let cs = &tree.branches[0];
        let years: Vec<u8> = cs.programs[0].years.iter().map(|y| y.year_number).collect();
        assert_eq!(years, vec![1, 2]);

        let sem1 = &cs.programs[0].years[0].semesters[0];
        let subject_codes: Vec<&str> = sem1.subjects.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(subject_codes, vec!["CS101", "CS202"]);
    }

    #[test]
    fn empty_program_yields_empty_years_not_error() {
        let tree = assemble(
            vec![branch("b1", "CS")],
            vec![program("p1", "b1", "BTech")],
            vec![],
            vec![],
            vec![],
        );
        assert_eq!(tree.branches[0].programs.len(), 1);
        assert!(tree.branches[0].programs[0].years.is_empty());
    }

    #[test]
    fn children_of_missing_parents_are_dropped() {
        let tree = assemble(
            vec![branch("b1", "CS")],
            vec![program("p1", "ghost_branch", "Orphan")],
            vec![year("y1", "ghost_program", 1)],
            vec![],
            vec![],
        );
        assert!(tree.branches[0].programs.is_empty());
    }

    #[test]
    fn empty_catalog_is_an_empty_tree() {
        let tree = assemble(vec![], vec![], vec![], vec![], vec![]);
        assert!(tree.branches.is_empty());
    }
}
