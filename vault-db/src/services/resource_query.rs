//! Resource filter composition
//!
//! Translates a validated search request into a persistence-layer filter.
//! Branch codes and semester numbers are resolved to subject-id sets before
//! the resource query runs; when that resolution comes back empty the
//! composer short-circuits to an empty page rather than letting an empty
//! restriction degenerate into an unfiltered scan.

use std::sync::Arc;

use vault_core::types::{ResourceKind, SortKey};
use vault_core::{Page, PageParams, VaultResult};

use crate::entities::ResourceEntity;
use crate::repos::{Database, ResourceSearch};

/// A validated resource search request. Sort keys and kinds are enum-typed
/// upstream; nothing in here is raw client text except the bound values.
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub q: Option<String>,
    pub kind: Option<ResourceKind>,
    pub branch_code: Option<String>,
    pub semester_number: Option<u8>,
    pub subject_id: Option<String>,
    pub sort: Option<SortKey>,
    /// Privileged callers may lift the approved-only restriction.
    pub include_unapproved: bool,
    /// Restrict to one contributor's own resources (also lifts the
    /// approved-only restriction, for that contributor only).
    pub added_by: Option<String>,
}

#[derive(Clone)]
pub struct ResourceQuery {
    db: Arc<Database>,
}

impl ResourceQuery {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Run a resource listing. Returns an empty page without touching the
    /// resource table when a branch/semester restriction matches nothing.
    pub async fn list(
        &self,
        filter: &ResourceFilter,
        params: PageParams,
    ) -> VaultResult<Page<ResourceEntity>> {
        let subject_ids = match self.resolve_subjects(filter).await? {
            SubjectRestriction::None => None,
            SubjectRestriction::Some(ids) => Some(ids),
            SubjectRestriction::Empty => return Ok(Page::empty(params)),
        };

        let search = compose(filter, subject_ids);
        let (items, total) = self.db.resources.search(&search, params).await?;
        Ok(Page::new(items, params, total))
    }

    /// Resolve branch/semester restrictions down to subject ids.
    async fn resolve_subjects(&self, filter: &ResourceFilter) -> VaultResult<SubjectRestriction> {
        let branch_id = match &filter.branch_code {
            Some(code) => match self.db.catalog.branch_by_code(code).await? {
                Some(branch) => Some(branch.branch_id),
                // Unknown branch code: nothing can match.
                None => return Ok(SubjectRestriction::Empty),
            },
            None => None,
        };

        let semester_ids = match filter.semester_number {
            Some(number) => {
                let semesters = self.db.catalog.semesters_by_number(number).await?;
                if semesters.is_empty() {
                    return Ok(SubjectRestriction::Empty);
                }
                Some(semesters.into_iter().map(|s| s.semester_id).collect())
            }
            None => None,
        };

        if branch_id.is_none() && semester_ids.is_none() {
            return Ok(SubjectRestriction::None);
        }

        let ids = self
            .db
            .catalog
            .subject_ids_matching(branch_id, semester_ids)
            .await?;
        if ids.is_empty() {
            Ok(SubjectRestriction::Empty)
        } else {
            Ok(SubjectRestriction::Some(ids))
        }
    }
}

enum SubjectRestriction {
    /// No branch/semester filter requested
    None,
    /// Restrict to these subject ids
    Some(Vec<String>),
    /// Restriction matched nothing; short-circuit to an empty page
    Empty,
}

/// Compose the WHERE expression and bind values. Every fragment is a fixed
/// string; client input only ever travels through the bound parameters.
fn compose(filter: &ResourceFilter, subject_ids: Option<Vec<String>>) -> ResourceSearch {
    let mut conds: Vec<&'static str> = Vec::new();

    if filter.added_by.is_some() {
        conds.push("added_by = $added_by");
    } else if !filter.include_unapproved {
        conds.push("is_approved = true");
    }
    if filter.kind.is_some() {
        conds.push("kind = $kind");
    }
    if filter.subject_id.is_some() {
        conds.push("subject_id = $subject_id");
    }
    if subject_ids.is_some() {
        conds.push("subject_id IN $subject_ids");
    }
    if filter.q.is_some() {
        conds.push("(title @@ $q OR description @@ $q OR tags @@ $q)");
    }

    let where_sql = if conds.is_empty() {
        "true".to_string()
    } else {
        conds.join(" AND ")
    };

    let sort = filter.sort.unwrap_or(SortKey::CreatedAt);
    ResourceSearch {
        where_sql,
        order_field: sort.field(),
        descending: sort.descending(),
        q: filter.q.clone().unwrap_or_default(),
        kind: filter
            .kind
            .map(|k| k.as_str().to_string())
            .unwrap_or_default(),
        subject_id: filter.subject_id.clone().unwrap_or_default(),
        subject_ids: subject_ids.unwrap_or_default(),
        added_by: filter.added_by.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_approved_only_newest_first() {
        let search = compose(&ResourceFilter::default(), None);
        assert_eq!(search.where_sql, "is_approved = true");
        assert_eq!(search.order_field, "created_at");
        assert!(search.descending);
    }

    #[test]
    fn filters_combine_with_and_semantics() {
        let filter = ResourceFilter {
            q: Some("signals".into()),
            kind: Some(ResourceKind::Notes),
            subject_id: Some("sub_1".into()),
            ..Default::default()
        };
        let search = compose(&filter, Some(vec!["sub_1".into(), "sub_2".into()]));
        assert_eq!(
            search.where_sql,
            "is_approved = true AND kind = $kind AND subject_id = $subject_id \
             AND subject_id IN $subject_ids AND (title @@ $q OR description @@ $q OR tags @@ $q)"
        );
        assert_eq!(search.kind, "notes");
        assert_eq!(search.subject_ids.len(), 2);
    }

    #[test]
    fn privileged_callers_can_lift_approval_restriction() {
        let filter = ResourceFilter {
            include_unapproved: true,
            ..Default::default()
        };
        let search = compose(&filter, None);
        assert_eq!(search.where_sql, "true");
    }

    #[test]
    fn own_listing_drops_approval_and_pins_contributor() {
        let filter = ResourceFilter {
            added_by: Some("usr_1".into()),
            ..Default::default()
        };
        let search = compose(&filter, None);
        assert_eq!(search.where_sql, "added_by = $added_by");
        assert_eq!(search.added_by, "usr_1");
    }

    #[test]
    fn sort_keys_map_to_storage_fields() {
        let filter = ResourceFilter {
            sort: Some(SortKey::QualityScore),
            ..Default::default()
        };
        let search = compose(&filter, None);
        assert_eq!(search.order_field, "quality_score");
        assert!(search.descending);

        let filter = ResourceFilter {
            sort: Some(SortKey::Name),
            ..Default::default()
        };
        let search = compose(&filter, None);
        assert_eq!(search.order_field, "title");
        assert!(!search.descending);
    }
}
