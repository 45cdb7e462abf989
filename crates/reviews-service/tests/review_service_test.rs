//! End-to-end service behaviour against the in-memory store and cache.

use reviews_core::{ProductId, Rating, ReviewId, UserId, VoteAction};
use reviews_service::ReviewService;
use reviews_test_utils::{
    create_request, list_key, review, review_service, review_service_with_ttl, vote_request,
    InMemoryCache, InMemoryReviewRepository,
};
use std::sync::Arc;
use std::time::Duration;

fn fixture() -> (Arc<InMemoryReviewRepository>, Arc<InMemoryCache>) {
    (
        Arc::new(InMemoryReviewRepository::new()),
        Arc::new(InMemoryCache::new()),
    )
}

#[tokio::test]
async fn test_second_read_is_served_from_cache() {
    let (repo, cache) = fixture();
    repo.insert(review("p1", 5));
    repo.insert(review("p1", 2));
    let service = review_service(repo, cache.clone());
    let product = ProductId::new("p1");

    let first = service.list_reviews(&product).await.unwrap();
    assert!(!first.cached);
    assert!(cache.contains(&list_key("p1")));

    let second = service.list_reviews(&product).await.unwrap();
    assert!(second.cached);
    assert_eq!(first.reviews, second.reviews);
}

#[tokio::test]
async fn test_cache_hides_writes_made_behind_its_back() {
    let (repo, cache) = fixture();
    let service = review_service(repo.clone(), cache);
    let product = ProductId::new("p1");

    service.list_reviews(&product).await.unwrap();
    // Written straight to the store, so no invalidation happens.
    repo.insert(review("p1", 4));

    let response = service.list_reviews(&product).await.unwrap();
    assert!(response.cached);
    assert!(response.reviews.is_empty());
}

#[tokio::test]
async fn test_entry_expires_after_ttl() {
    let (repo, cache) = fixture();
    let service = review_service_with_ttl(repo, cache, Duration::from_millis(30));
    let product = ProductId::new("p1");

    service.list_reviews(&product).await.unwrap();
    assert!(service.list_reviews(&product).await.unwrap().cached);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(!service.list_reviews(&product).await.unwrap().cached);
}

#[tokio::test]
async fn test_every_accepted_mutation_invalidates() {
    let (repo, cache) = fixture();
    let service = review_service(repo, cache);
    let product = ProductId::new("p1");

    let created = service.create_review(create_request("p1", 4)).await.unwrap();
    assert_eq!(created.message, "Review created");

    let mutations = [
        VoteAction::Like,
        VoteAction::Unlike,
        VoteAction::Dislike,
        VoteAction::Undislike,
    ];
    for action in mutations {
        service.list_reviews(&product).await.unwrap();
        let response = service
            .vote(created.id, action, vote_request("alice"))
            .await
            .unwrap();
        assert_eq!(response.message, action.success_message());
        assert!(!service.list_reviews(&product).await.unwrap().cached);
    }

    service.list_reviews(&product).await.unwrap();
    let deleted = service.delete_review(created.id).await.unwrap();
    assert_eq!(deleted.message, "Deleted (soft)");
    let after = service.list_reviews(&product).await.unwrap();
    assert!(!after.cached);
    assert!(after.reviews.is_empty());
}

#[tokio::test]
async fn test_create_assigns_defaults() {
    let (repo, cache) = fixture();
    let service = review_service(repo.clone(), cache);

    let created = service.create_review(create_request("p1", 3)).await.unwrap();
    let stored = repo.get(created.id).unwrap();

    assert_eq!(stored.product_id.as_str(), "p1");
    assert_eq!(stored.rating.value(), 3);
    assert!(!stored.is_deleted);
    assert_eq!((stored.like_count, stored.dislike_count), (0, 0));
    assert!(stored.liked_users.is_empty() && stored.disliked_users.is_empty());
}

#[tokio::test]
async fn test_like_after_dislike_moves_both_counters() {
    let (repo, cache) = fixture();
    let target = review("p1", 5);
    repo.insert(target.clone());
    let service = review_service(repo.clone(), cache);
    let alice = UserId::new("alice");

    service
        .vote(target.id, VoteAction::Dislike, vote_request("alice"))
        .await
        .unwrap();
    let before = repo.get(target.id).unwrap();
    assert_eq!((before.like_count, before.dislike_count), (0, 1));

    service
        .vote(target.id, VoteAction::Like, vote_request("alice"))
        .await
        .unwrap();
    let after = repo.get(target.id).unwrap();
    assert_eq!((after.like_count, after.dislike_count), (1, 0));
    assert!(after.liked_users.contains(&alice));
    assert!(!after.disliked_users.contains(&alice));
    assert!(after.counters_consistent());
}

#[tokio::test]
async fn test_double_like_leaves_state_and_cache_unchanged() {
    let (repo, cache) = fixture();
    let target = review("p1", 5);
    repo.insert(target.clone());
    let service = review_service(repo.clone(), cache);
    let product = ProductId::new("p1");

    service
        .vote(target.id, VoteAction::Like, vote_request("bob"))
        .await
        .unwrap();
    service.list_reviews(&product).await.unwrap();
    let before = repo.get(target.id).unwrap();

    let err = service
        .vote(target.id, VoteAction::Like, vote_request("bob"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Already liked");
    assert_eq!(err.status_code(), 400);

    assert_eq!(repo.get(target.id).unwrap(), before);
    assert!(service.list_reviews(&product).await.unwrap().cached);
}

#[tokio::test]
async fn test_rejected_transitions_report_their_reason() {
    let (repo, cache) = fixture();
    let target = review("p1", 5);
    repo.insert(target.clone());
    let service = review_service(repo, cache);

    let cases = [
        (VoteAction::Unlike, "Not liked yet"),
        (VoteAction::Undislike, "Not disliked yet"),
    ];
    for (action, reason) in cases {
        let err = service
            .vote(target.id, action, vote_request("carol"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), reason);
    }

    service
        .vote(target.id, VoteAction::Dislike, vote_request("carol"))
        .await
        .unwrap();
    let err = service
        .vote(target.id, VoteAction::Dislike, vote_request("carol"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Already disliked");
}

#[tokio::test]
async fn test_soft_deleted_review_stays_reachable_by_id() {
    let (repo, cache) = fixture();
    let target = review("p1", 2);
    repo.insert(target.clone());
    let service = review_service(repo, cache);

    service.delete_review(target.id).await.unwrap();

    let listed = service.list_reviews(&ProductId::new("p1")).await.unwrap();
    assert!(listed.reviews.iter().all(|r| r.id != target.id));

    let found = service.get_review(target.id).await.unwrap();
    assert!(found.is_deleted);

    // Deleting again is still a success.
    assert!(service.delete_review(target.id).await.is_ok());
}

#[tokio::test]
async fn test_missing_review_is_not_found() {
    let (repo, cache) = fixture();
    let service = review_service(repo, cache.clone());
    let id = ReviewId::new();

    assert_eq!(service.get_review(id).await.unwrap_err().status_code(), 404);
    assert_eq!(service.delete_review(id).await.unwrap_err().status_code(), 404);
    for action in [VoteAction::Unlike, VoteAction::Undislike] {
        let err = service.vote(id, action, vote_request("dave")).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
    assert_eq!(cache.delete_calls(), 0);
}

#[tokio::test]
async fn test_stats_and_average() {
    let (repo, cache) = fixture();
    for rating in [5, 5, 4, 3, 3, 3] {
        repo.insert(review("p1", rating));
    }
    let service = review_service(repo, cache);
    let product = ProductId::new("p1");

    let stats = service.rating_stats(&product).await.unwrap();
    assert_eq!(stats.total_reviews, 6);
    let percent = |rating: i64| stats.bucket(Rating::new(rating).unwrap()).unwrap().percent;
    assert!((percent(3) - 50.0).abs() < f64::EPSILON);
    assert!((percent(5) - 33.33).abs() < f64::EPSILON);
    assert!((percent(4) - 16.67).abs() < f64::EPSILON);
    assert!(percent(1).abs() < f64::EPSILON);
    assert!(percent(2).abs() < f64::EPSILON);

    let average = service.average_rating(&product).await.unwrap();
    assert_eq!(average.product_id, product);
    assert!((average.average_rating - 3.83).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_aggregates_bypass_the_cache() {
    let (repo, cache) = fixture();
    repo.insert(review("p1", 5));
    let service = review_service(repo.clone(), cache);
    let product = ProductId::new("p1");

    service.list_reviews(&product).await.unwrap();
    repo.insert(review("p1", 1));

    let stats = service.rating_stats(&product).await.unwrap();
    assert_eq!(stats.total_reviews, 2);
    let average = service.average_rating(&product).await.unwrap();
    assert!((average.average_rating - 3.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_filtered_reads() {
    let (repo, cache) = fixture();
    for rating in [5, 3, 3] {
        repo.insert(review("p1", rating));
    }
    let service = review_service(repo, cache.clone());
    let product = ProductId::new("p1");
    let three = Some(Rating::new(3).unwrap());

    let miss = service.list_reviews_by_rating(&product, three).await.unwrap();
    assert!(!miss.cached);
    assert_eq!(miss.reviews.len(), 2);
    assert!(!cache.contains(&list_key("p1")));

    service.list_reviews(&product).await.unwrap();

    let hit = service.list_reviews_by_rating(&product, three).await.unwrap();
    assert!(hit.cached);
    assert_eq!(hit.reviews, miss.reviews);

    let unfiltered = service.list_reviews_by_rating(&product, None).await.unwrap();
    assert!(unfiltered.cached);
    assert_eq!(unfiltered.reviews.len(), 3);
}

#[tokio::test]
async fn test_store_failure_leaves_cache_untouched() {
    let (repo, cache) = fixture();
    let target = review("p1", 4);
    repo.insert(target.clone());
    let service = review_service(repo.clone(), cache.clone());

    service.list_reviews(&ProductId::new("p1")).await.unwrap();
    repo.set_failing(true);

    assert!(service.create_review(create_request("p1", 5)).await.is_err());
    assert!(service
        .vote(target.id, VoteAction::Like, vote_request("erin"))
        .await
        .is_err());
    assert!(service.delete_review(target.id).await.is_err());

    assert_eq!(cache.delete_calls(), 0);
    assert!(cache.contains(&list_key("p1")));
}

#[tokio::test]
async fn test_invalidation_failure_still_succeeds() {
    let (repo, cache) = fixture();
    let target = review("p1", 4);
    repo.insert(target.clone());
    let service = review_service(repo.clone(), cache.clone());
    cache.fail_deletes(true);

    let response = service
        .vote(target.id, VoteAction::Like, vote_request("frank"))
        .await
        .unwrap();
    assert_eq!(response.message, "Liked");
    assert_eq!(cache.delete_calls(), 1);
    assert_eq!(repo.get(target.id).unwrap().like_count, 1);
}

#[tokio::test]
async fn test_unreachable_cache_falls_through_to_store() {
    let (repo, cache) = fixture();
    repo.insert(review("p1", 4));
    cache.fail_reads(true);
    cache.fail_writes(true);
    let service = review_service(repo, cache);
    let product = ProductId::new("p1");

    for _ in 0..2 {
        let response = service.list_reviews(&product).await.unwrap();
        assert!(!response.cached);
        assert_eq!(response.reviews.len(), 1);
    }
}

#[tokio::test]
async fn test_concurrent_votes_keep_counters_consistent() {
    let (repo, cache) = fixture();
    let target = review("p1", 4);
    repo.insert(target.clone());
    let service = Arc::new(review_service(repo.clone(), cache));

    let mut handles = Vec::new();
    for i in 0..20 {
        let service = Arc::clone(&service);
        let action = if i % 2 == 0 { VoteAction::Like } else { VoteAction::Dislike };
        handles.push(tokio::spawn(async move {
            service
                .vote(target.id, action, vote_request(&format!("user-{i}")))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = repo.get(target.id).unwrap();
    assert_eq!((stored.like_count, stored.dislike_count), (10, 10));
    assert!(stored.counters_consistent());
}
