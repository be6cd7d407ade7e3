//! Store-level tests against an in-memory datastore.

use std::sync::Arc;

use vault_core::types::ResourceKind;
use vault_core::{PageParams, VaultError};
use vault_db::entities::{BranchEntity, RatingEntity, ResourceEntity, SubjectEntity, UserEntity};
use vault_db::{connect, Database, RatingService, ResourceFilter, ResourceQuery};

async fn test_database() -> Arc<Database> {
    let db = connect("mem://", "vault_test", "vault_test").await.unwrap();
    let database = Arc::new(Database::new(db));
    database.init_schema().await.unwrap();
    database
}

fn test_user(name: &str) -> UserEntity {
    UserEntity::new(
        name.to_string(),
        format!("{name}@example.edu"),
        name.to_uppercase(),
        "$argon2id$fake".to_string(),
        "tok".to_string(),
    )
}

fn test_resource(title: &str, subject_id: &str, added_by: &str) -> ResourceEntity {
    ResourceEntity::new(
        ResourceKind::Notes,
        title.to_string(),
        "https://example.edu/notes.pdf".to_string(),
        "lecture notes".to_string(),
        "prof".to_string(),
        subject_id.to_string(),
        vec![],
        vec!["exam".to_string()],
        vec![],
        added_by.to_string(),
    )
}

#[tokio::test]
async fn duplicate_rating_pair_is_a_conflict() {
    let db = test_database().await;
    let first = RatingEntity::new("res_1".into(), "usr_1".into(), 4, None);
    let second = RatingEntity::new("res_1".into(), "usr_1".into(), 5, None);

    db.ratings.create(&first).await.unwrap();
    let err = db.ratings.create(&second).await.unwrap_err();
    assert!(matches!(err, VaultError::Conflict(_)), "got {err:?}");

    // A different user on the same resource is fine.
    let other = RatingEntity::new("res_1".into(), "usr_2".into(), 3, None);
    db.ratings.create(&other).await.unwrap();
}

#[tokio::test]
async fn submit_twice_updates_in_place_and_keeps_total() {
    let db = test_database().await;
    let user = db.users.create(&test_user("alice")).await.unwrap();
    let resource = db
        .resources
        .create(&test_resource("DSP notes", "sub_1", &user.user_id))
        .await
        .unwrap();
    let service = RatingService::new(db.clone());

    let first = service
        .submit(&resource.resource_id, &user.user_id, 4, Some("good".into()))
        .await
        .unwrap();
    let second = service
        .submit(&resource.resource_id, &user.user_id, 5, None)
        .await
        .unwrap();

    assert_eq!(first.rating.rating_id, second.rating.rating_id);
    assert_eq!(second.rating.rating, 5);
    assert_eq!(second.author_name, "ALICE");

    let updated = db.resources.get(&resource.resource_id).await.unwrap().unwrap();
    assert_eq!(updated.total_ratings, 1);
    assert_eq!(updated.average_rating, 5.0);
    assert_eq!(updated.rating_distribution.five, 1);
    assert_eq!(updated.rating_distribution.four, 0);
}

#[tokio::test]
async fn aggregate_tracks_mean_and_buckets_across_users() {
    let db = test_database().await;
    let service = RatingService::new(db.clone());
    let owner = db.users.create(&test_user("bob")).await.unwrap();
    let resource = db
        .resources
        .create(&test_resource("Signals book", "sub_1", &owner.user_id))
        .await
        .unwrap();

    for (user, stars) in [("u1", 5), ("u2", 4), ("u3", 4)] {
        let u = db.users.create(&test_user(user)).await.unwrap();
        service
            .submit(&resource.resource_id, &u.user_id, stars, None)
            .await
            .unwrap();
    }

    let updated = db.resources.get(&resource.resource_id).await.unwrap().unwrap();
    assert_eq!(updated.total_ratings, 3);
    // (5 + 4 + 4) / 3 = 4.333… -> 4.3
    assert_eq!(updated.average_rating, 4.3);
    assert_eq!(updated.rating_distribution.total(), 3);
}

#[tokio::test]
async fn deleting_only_rating_resets_the_aggregate() {
    let db = test_database().await;
    let service = RatingService::new(db.clone());
    let user = db.users.create(&test_user("carol")).await.unwrap();
    let resource = db
        .resources
        .create(&test_resource("Algo syllabus", "sub_1", &user.user_id))
        .await
        .unwrap();

    let rated = service
        .submit(&resource.resource_id, &user.user_id, 2, None)
        .await
        .unwrap();
    service.delete(&rated.rating).await.unwrap();

    let updated = db.resources.get(&resource.resource_id).await.unwrap().unwrap();
    assert_eq!(updated.total_ratings, 0);
    assert_eq!(updated.average_rating, 0.0);
    assert_eq!(updated.rating_distribution.total(), 0);
}

#[tokio::test]
async fn rating_a_missing_resource_is_not_found() {
    let db = test_database().await;
    let service = RatingService::new(db.clone());
    let err = service.submit("res_missing", "usr_1", 3, None).await.unwrap_err();
    assert!(matches!(err, VaultError::NotFound(_)));
}

#[tokio::test]
async fn out_of_range_rating_never_reaches_the_store() {
    let db = test_database().await;
    let service = RatingService::new(db.clone());
    for bad in [0u8, 6, 200] {
        let err = service.submit("res_1", "usr_1", bad, None).await.unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)), "value {bad}");
    }
}

#[tokio::test]
async fn listing_paginates_and_hides_unapproved() {
    let db = test_database().await;
    let query = ResourceQuery::new(db.clone());

    for i in 0..15 {
        let mut r = test_resource(&format!("Notes {i:02}"), "sub_1", "usr_1");
        r.is_approved = true;
        db.resources.create(&r).await.unwrap();
    }
    // Unapproved resource must never show up in the public listing.
    db.resources
        .create(&test_resource("Hidden draft", "sub_1", "usr_1"))
        .await
        .unwrap();

    let params = PageParams { page: 2, limit: 10 };
    let page = query.list(&ResourceFilter::default(), params).await.unwrap();
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total, 15);
    assert_eq!(page.pages, 2);
    assert!(page.items.iter().all(|r| r.is_approved));
}

#[tokio::test]
async fn unknown_branch_code_short_circuits_to_empty_page() {
    let db = test_database().await;
    let query = ResourceQuery::new(db.clone());

    let mut r = test_resource("Visible", "sub_1", "usr_1");
    r.is_approved = true;
    db.resources.create(&r).await.unwrap();

    let filter = ResourceFilter {
        branch_code: Some("XX".into()),
        ..Default::default()
    };
    let page = query
        .list(&filter, PageParams { page: 1, limit: 20 })
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.pages, 0);
}

#[tokio::test]
async fn branch_filter_restricts_to_its_subjects() {
    let db = test_database().await;
    let query = ResourceQuery::new(db.clone());

    let cs = db.catalog.create_branch(&BranchEntity::new("CS".into(), "Computing".into())).await.unwrap();
    let ee = db.catalog.create_branch(&BranchEntity::new("EE".into(), "Electrical".into())).await.unwrap();
    let cs_subject = db
        .catalog
        .create_subject(&SubjectEntity::new(
            "CS101".into(),
            "Programming".into(),
            cs.branch_id.clone(),
            "sem_1".into(),
            4,
            vec![],
        ))
        .await
        .unwrap();
    let ee_subject = db
        .catalog
        .create_subject(&SubjectEntity::new(
            "EE101".into(),
            "Circuits".into(),
            ee.branch_id.clone(),
            "sem_1".into(),
            4,
            vec![],
        ))
        .await
        .unwrap();

    for subject in [&cs_subject, &ee_subject] {
        let mut r = test_resource("Course pack", &subject.subject_id, "usr_1");
        r.is_approved = true;
        db.resources.create(&r).await.unwrap();
    }

    let filter = ResourceFilter {
        branch_code: Some("CS".into()),
        ..Default::default()
    };
    let page = query
        .list(&filter, PageParams { page: 1, limit: 20 })
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].subject_id, cs_subject.subject_id);
}

#[tokio::test]
async fn duplicate_subject_code_is_a_conflict() {
    let db = test_database().await;
    let a = SubjectEntity::new("CS101".into(), "Intro".into(), "b1".into(), "s1".into(), 4, vec![]);
    let b = SubjectEntity::new("CS101".into(), "Copy".into(), "b1".into(), "s1".into(), 4, vec![]);
    db.catalog.create_subject(&a).await.unwrap();
    let err = db.catalog.create_subject(&b).await.unwrap_err();
    assert!(matches!(err, VaultError::Conflict(_)));
}

#[tokio::test]
async fn duplicate_username_or_email_is_a_conflict() {
    let db = test_database().await;
    db.users.create(&test_user("dave")).await.unwrap();
    let err = db.users.create(&test_user("dave")).await.unwrap_err();
    assert!(matches!(err, VaultError::Conflict(_)));
}
