//! Roadmap entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vault_core::types::{Difficulty, RoadmapKind};

use super::new_id;

/// One step of a study plan. Consumers sort by `order`; the store does not
/// enforce contiguity or uniqueness of the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub title: String,
    pub description: String,
    pub order: u32,
    pub estimated_hours: f64,
    pub prerequisites: Vec<String>,
    pub resources: Vec<String>,
}

/// A curated, ordered study plan scoped to one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapEntity {
    pub roadmap_id: String,
    pub subject_id: String,
    pub kind: RoadmapKind,
    pub title: String,
    pub description: String,
    pub total_estimated_hours: f64,
    pub difficulty: Difficulty,
    pub steps: Vec<RoadmapStep>,
    pub created_by: String,
    pub is_public: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoadmapEntity {
    pub const TABLE: &'static str = "roadmap";

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        subject_id: String,
        kind: RoadmapKind,
        title: String,
        description: String,
        difficulty: Difficulty,
        steps: Vec<RoadmapStep>,
        created_by: String,
        is_public: bool,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        let total_estimated_hours = steps.iter().map(|s| s.estimated_hours).sum();
        Self {
            roadmap_id: new_id("map"),
            subject_id,
            kind,
            title,
            description,
            total_estimated_hours,
            difficulty,
            steps,
            created_by,
            is_public,
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Steps in consumer order
    pub fn sorted_steps(&self) -> Vec<RoadmapStep> {
        let mut steps = self.steps.clone();
        steps.sort_by_key(|s| s.order);
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(order: u32, hours: f64) -> RoadmapStep {
        RoadmapStep {
            title: format!("step {order}"),
            description: String::new(),
            order,
            estimated_hours: hours,
            prerequisites: vec![],
            resources: vec![],
        }
    }

    #[test]
    fn steps_come_back_sorted_by_order() {
        let map = RoadmapEntity::new(
            "sub_1".into(),
            RoadmapKind::Endsem,
            "DSA crunch".into(),
            String::new(),
            Difficulty::Intermediate,
            vec![step(3, 2.0), step(1, 1.0), step(2, 4.5)],
            "usr_1".into(),
            true,
            vec![],
        );
        let orders: Vec<u32> = map.sorted_steps().iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert!((map.total_estimated_hours - 7.5).abs() < f64::EPSILON);
    }
}
