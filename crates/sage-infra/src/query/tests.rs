use std::collections::HashSet;

use chrono::{Duration, Utc};
use sea_orm::{DbBackend, EntityTrait, QueryTrait};

use sage_core::ranking::{RecentTagsParams, TrendTagsParams};
use sage_core::{Capabilities, QueryError, SearchTerm};

use super::{CategoryQuery, PostQuery, TagQuery};
use crate::database::entity::post;
use crate::fixtures;
use crate::search::{FullTextStrategy, SearchStrategy, TrigramStrategy};

fn ids<T>(items: &[T], id: impl Fn(&T) -> i32) -> Vec<i32> {
    items.iter().map(id).collect()
}

#[tokio::test]
async fn test_visibility_partitions_every_entity() {
    let store = fixtures::store().await;
    let db = store.conn();
    let shown = fixtures::category(db, "Shown", true).await;
    fixtures::category(db, "Hidden", false).await;
    fixtures::tag(db, "Public", true).await;
    fixtures::tag(db, "Private", false).await;
    fixtures::tag(db, "Draft", false).await;
    for (i, published) in [true, false, true, true].into_iter().enumerate() {
        fixtures::post(db, shown.id, &format!("Post {i}"), published, 0).await;
    }

    let all: HashSet<i32> = PostQuery::new().all(db).await.unwrap().iter().map(|p| p.id).collect();
    let on: HashSet<i32> = PostQuery::new()
        .filter_published(true)
        .all(db)
        .await
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    let off: HashSet<i32> = PostQuery::new()
        .filter_published(false)
        .all(db)
        .await
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert!(on.is_disjoint(&off));
    assert_eq!(&on | &off, all);
    assert_eq!((on.len(), off.len()), (3, 1));

    let categories = CategoryQuery::new().count(db).await.unwrap();
    let published = CategoryQuery::new().filter_published(true).count(db).await.unwrap();
    let hidden = CategoryQuery::new().filter_published(false).count(db).await.unwrap();
    assert_eq!(published + hidden, categories);

    let tags = TagQuery::new().count(db).await.unwrap();
    let published = TagQuery::new().filter_published(true).count(db).await.unwrap();
    let hidden = TagQuery::new().filter_published(false).count(db).await.unwrap();
    assert_eq!((published, hidden), (1, 2));
    assert_eq!(published + hidden, tags);
}

#[tokio::test]
async fn test_unknown_slugs_yield_empty() {
    let store = fixtures::store().await;
    let db = store.conn();
    let news = fixtures::category(db, "News", true).await;
    fixtures::post(db, news.id, "Hello", true, 0).await;

    assert!(PostQuery::new().filter_by_category("missing").all(db).await.unwrap().is_empty());
    assert!(PostQuery::new().filter_by_tag("missing").all(db).await.unwrap().is_empty());
    assert_eq!(PostQuery::new().filter_by_category("news").count(db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_tag_filter_lists_each_post_once() {
    let store = fixtures::store().await;
    let db = store.conn();
    let news = fixtures::category(db, "News", true).await;
    let rust = fixtures::tag(db, "Rust", true).await;
    let tokio = fixtures::tag(db, "Tokio", true).await;
    let both = fixtures::post(db, news.id, "Both", true, 0).await;
    let neither = fixtures::post(db, news.id, "Neither", true, 0).await;
    fixtures::tag_post(db, both.id, &[rust.id, tokio.id]).await;

    let posts = PostQuery::new().filter_by_tag("rust").all(db).await.unwrap();
    assert_eq!(ids(&posts, |p| p.id), [both.id]);

    let filter = sage_core::domain::PostFilter {
        category: Some("news".to_string()),
        tag: Some("tokio".to_string()),
    };
    let filtered = PostQuery::new().apply_filter(&filter).all(db).await.unwrap();
    assert_eq!(ids(&filtered, |p| p.id), [both.id]);
    assert!(!ids(&filtered, |p| p.id).contains(&neither.id));
}

#[tokio::test]
async fn test_category_totals_scenario() {
    let store = fixtures::store().await;
    let db = store.conn();
    let p1 = fixtures::category(db, "P1", true).await;
    let p2 = fixtures::category(db, "P2", true).await;
    let u1 = fixtures::category(db, "U1", false).await;
    for i in 0..5 {
        fixtures::post(db, p1.id, &format!("P1 post {i}"), true, 0).await;
    }
    for i in 0..3 {
        fixtures::post(db, p2.id, &format!("P2 post {i}"), false, 0).await;
    }

    let with_published = CategoryQuery::new()
        .filter_published_posts(true)
        .annotate_total_posts()
        .all(db)
        .await
        .unwrap();
    assert_eq!(with_published.len(), 1);
    assert_eq!(with_published[0].category.id, p1.id);
    assert_eq!(with_published[0].total_posts, 5);

    let totals: Vec<(i32, i64)> = CategoryQuery::new()
        .annotate_total_posts()
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.category.id, c.total_posts))
        .collect();
    assert_eq!(totals, [(p1.id, 5), (p2.id, 0), (u1.id, 0)]);

    let empty = CategoryQuery::new().filter_without_posts().all(db).await.unwrap();
    assert_eq!(ids(&empty, |c| c.id), [u1.id]);

    let drafts_only = CategoryQuery::new()
        .filter_published_posts(false)
        .all(db)
        .await
        .unwrap();
    assert_eq!(ids(&drafts_only, |c| c.id), [p2.id]);
}

/// T1 on five posts from today, T2 on three posts from 40 days ago, T3 unused.
async fn tag_usage_fixture(db: &sea_orm::DbConn) -> [i32; 3] {
    let news = fixtures::category(db, "News", true).await;
    let t1 = fixtures::tag(db, "T1", true).await;
    let t2 = fixtures::tag(db, "T2", true).await;
    let t3 = fixtures::tag(db, "T3", true).await;
    for i in 0..5 {
        let post = fixtures::post(db, news.id, &format!("Fresh {i}"), true, 0).await;
        fixtures::tag_post(db, post.id, &[t1.id]).await;
    }
    for i in 0..3 {
        let post = fixtures::post(db, news.id, &format!("Old {i}"), true, 40).await;
        fixtures::tag_post(db, post.id, &[t2.id]).await;
    }
    [t1.id, t2.id, t3.id]
}

#[tokio::test]
async fn test_tag_ranking_scenario() {
    let store = fixtures::store().await;
    let db = store.conn();
    let [t1, t2, _t3] = tag_usage_fixture(db).await;

    let recent = TagQuery::new()
        .filter_recent_tags(&RecentTagsParams {
            days_ago: 30,
            ..Default::default()
        })
        .unwrap()
        .all(db)
        .await
        .unwrap();
    assert_eq!(ids(&recent, |t| t.id), [t1]);

    let trend = TagQuery::new()
        .filter_trend_tags(&TrendTagsParams {
            days_ago: 0,
            min_count: 1,
            limit: None,
        })
        .unwrap()
        .all(db)
        .await
        .unwrap();
    let ranked: Vec<(i32, i64)> = trend.iter().map(|t| (t.tag.id, t.posts_count)).collect();
    assert_eq!(ranked, [(t1, 5), (t2, 3)]);
}

#[tokio::test]
async fn test_trend_threshold_and_window() {
    let store = fixtures::store().await;
    let db = store.conn();
    let [t1, _t2, _t3] = tag_usage_fixture(db).await;

    let all_time = TagQuery::new()
        .filter_trend_tags(&TrendTagsParams {
            days_ago: 0,
            min_count: 5,
            limit: None,
        })
        .unwrap()
        .all(db)
        .await
        .unwrap();
    assert_eq!(ids(&all_time, |t| t.tag.id), [t1]);
    assert!(all_time.iter().all(|t| t.posts_count >= 5));

    let windowed = TagQuery::new()
        .filter_trend_tags(&TrendTagsParams {
            days_ago: 30,
            min_count: 1,
            limit: Some(5),
        })
        .unwrap()
        .all(db)
        .await
        .unwrap();
    assert_eq!(ids(&windowed, |t| t.tag.id), [t1]);
}

#[test]
fn test_trend_rejects_non_positive_min_count() {
    for min_count in [0, -1] {
        let result = TagQuery::new().filter_trend_tags(&TrendTagsParams {
            days_ago: 0,
            min_count,
            limit: None,
        });
        assert!(matches!(
            result,
            Err(QueryError::InvalidArgument {
                name: "min_count",
                ..
            })
        ));
    }
}

#[test]
fn test_recent_rejects_negative_window() {
    let result = TagQuery::new().filter_recent_tags(&RecentTagsParams {
        days_ago: -1,
        ..Default::default()
    });
    assert!(result.unwrap_err().is_invalid_argument());
}

#[tokio::test]
async fn test_recent_all_time_orders_by_latest_use() {
    let store = fixtures::store().await;
    let db = store.conn();
    let [t1, t2, t3] = tag_usage_fixture(db).await;

    let all_time = TagQuery::new()
        .filter_recent_tags(&RecentTagsParams {
            days_ago: 0,
            ..Default::default()
        })
        .unwrap()
        .all(db)
        .await
        .unwrap();
    assert_eq!(ids(&all_time, |t| t.id), [t1, t2, t3]);

    let trimmed = TagQuery::new()
        .filter_recent_tags(&RecentTagsParams {
            days_ago: 0,
            limit: Some(1),
            exclude: Some(t1),
        })
        .unwrap()
        .all(db)
        .await
        .unwrap();
    assert_eq!(ids(&trimmed, |t| t.id), [t2]);
}

#[tokio::test]
async fn test_tag_annotations_and_filters() {
    let store = fixtures::store().await;
    let db = store.conn();
    let news = fixtures::category(db, "News", true).await;
    let misc = fixtures::category(db, "Misc", true).await;
    let rust = fixtures::tag(db, "Rust Lang", true).await;
    let go = fixtures::tag(db, "Go", true).await;
    let wip = fixtures::tag(db, "Wip", true).await;
    let live = fixtures::post(db, news.id, "Live", true, 0).await;
    let draft = fixtures::post(db, news.id, "Draft", false, 0).await;
    let old = fixtures::post(db, misc.id, "Old", true, 20).await;
    fixtures::tag_post(db, live.id, &[rust.id]).await;
    fixtures::tag_post(db, draft.id, &[rust.id, go.id, wip.id]).await;
    fixtures::tag_post(db, old.id, &[go.id]).await;

    let totals: Vec<(i32, i64)> = TagQuery::new()
        .annotate_total_posts()
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|t| (t.tag.id, t.total_posts))
        .collect();
    assert_eq!(totals, [(rust.id, 1), (go.id, 1), (wip.id, 0)]);

    let popular = TagQuery::new().sort_by_popularity().all(db).await.unwrap();
    let counts: Vec<i64> = popular.iter().map(|t| t.posts_count).collect();
    assert_eq!(counts, [2, 2, 1]);
    assert_eq!(popular[2].tag.id, wip.id);

    let found = TagQuery::new().search("  rUsT ").all(db).await.unwrap();
    assert_eq!(ids(&found, |t| t.id), [rust.id]);
    assert_eq!(TagQuery::new().search("").count(db).await.unwrap(), 3);

    let in_misc = TagQuery::new().filter_by_posts_category("misc").all(db).await.unwrap();
    assert_eq!(ids(&in_misc, |t| t.id), [go.id]);

    let used = TagQuery::new().exclude_unpublished_posts().all(db).await.unwrap();
    assert_eq!(ids(&used, |t| t.id), [rust.id, go.id]);

    let now = Utc::now();
    let weeks_ago = TagQuery::new()
        .filter_by_post_date_range(now - Duration::days(25), now - Duration::days(15))
        .all(db)
        .await
        .unwrap();
    assert_eq!(ids(&weeks_ago, |t| t.id), [go.id]);

    assert!(TagQuery::new()
        .filter_by_post_date_range(now, now - Duration::days(1))
        .all(db)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_blank_search_is_identity() {
    let store = fixtures::store().await;
    let db = store.conn();
    let news = fixtures::category(db, "News", true).await;
    for title in ["One", "Two", "Three"] {
        fixtures::post(db, news.id, title, true, 0).await;
    }
    let caps = store.capabilities();

    for blank in ["", "   ", "\t\n"] {
        let searched = PostQuery::new()
            .filter_published(true)
            .heavy_search(db, &caps, blank)
            .await
            .unwrap()
            .all(db)
            .await
            .unwrap();
        assert_eq!(searched.len(), 3);
    }
}

#[tokio::test]
async fn test_heavy_search_falls_back_to_substring() {
    let store = fixtures::store().await;
    let db = store.conn();
    let news = fixtures::category(db, "News", true).await;
    let hit = fixtures::post_with_body(db, news.id, "Ownership", "Borrowing in RUST explained").await;
    fixtures::post_with_body(db, news.id, "Gardening", "Tomatoes and basil").await;
    let caps = store.capabilities();
    assert!(!caps.full_text);

    let found = PostQuery::new()
        .heavy_search(db, &caps, "rust")
        .await
        .unwrap()
        .all(db)
        .await
        .unwrap();
    assert_eq!(ids(&found, |p| p.id), [hit.id]);

    let nothing = PostQuery::new()
        .heavy_search(db, &caps, "kubernetes")
        .await
        .unwrap()
        .count(db)
        .await
        .unwrap();
    assert_eq!(nothing, 0);
}

#[tokio::test]
async fn test_substring_search_escapes_wildcards() {
    let store = fixtures::store().await;
    let db = store.conn();
    let news = fixtures::category(db, "News", true).await;
    let literal = fixtures::post_with_body(db, news.id, "Full Throttle", "Running at 100% today").await;
    fixtures::post_with_body(db, news.id, "Big Number", "It reached 1000 users").await;
    fixtures::post_with_body(db, news.id, "Snake", "my_var naming").await;
    let caps = store.capabilities();

    let found = PostQuery::new().substring_search(&caps, "100%").all(db).await.unwrap();
    assert_eq!(ids(&found, |p| p.id), [literal.id]);

    let underscore = PostQuery::new().substring_search(&caps, "y_v").count(db).await.unwrap();
    assert_eq!(underscore, 1);
    let no_wildcard = PostQuery::new().substring_search(&caps, "y%v").count(db).await.unwrap();
    assert_eq!(no_wildcard, 0);
}

#[tokio::test]
async fn test_unsupported_strategies_yield_empty() {
    let store = fixtures::store().await;
    let db = store.conn();
    let news = fixtures::category(db, "News", true).await;
    fixtures::post(db, news.id, "Anything", true, 0).await;
    let caps = Capabilities::basic();

    assert_eq!(PostQuery::new().full_text_search(&caps, "anything").count(db).await.unwrap(), 0);
    assert_eq!(
        PostQuery::new().trigram_similarity_search(&caps, "anything").count(db).await.unwrap(),
        0
    );
    assert_eq!(PostQuery::new().full_text_search(&caps, " ").count(db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_search_narrows_within_slug_filters() {
    let store = fixtures::store().await;
    let db = store.conn();
    let news = fixtures::category(db, "News", true).await;
    let misc = fixtures::category(db, "Misc", true).await;
    let in_news = fixtures::post_with_body(db, news.id, "Rust in News", "rust").await;
    fixtures::post_with_body(db, misc.id, "Rust in Misc", "rust").await;

    let found = PostQuery::new()
        .filter_by_category("news")
        .heavy_search(db, &store.capabilities(), "rust")
        .await
        .unwrap()
        .all(db)
        .await
        .unwrap();
    assert_eq!(ids(&found, |p| p.id), [in_news.id]);
}

#[test]
fn test_postgres_strategies_sql() {
    let term = SearchTerm::parse("rust async").unwrap();

    let full_text = FullTextStrategy
        .apply(post::Entity::find(), &term)
        .build(DbBackend::Postgres)
        .to_string();
    assert!(full_text.contains("plainto_tsquery('rust async')"));
    assert!(full_text.contains(r#"to_tsvector(COALESCE("sage_post"."title", '')"#));

    let trigram = TrigramStrategy
        .apply(post::Entity::find(), &term)
        .build(DbBackend::Postgres)
        .to_string();
    assert!(trigram.contains(r#"similarity("sage_post"."title", 'rust async')"#));
    assert!(trigram.contains("> 0.1"));
    assert!(trigram.contains("ORDER BY similarity("));
    assert!(trigram.trim_end().ends_with("DESC"));
}

#[tokio::test]
async fn test_post_annotations() {
    let store = fixtures::store().await;
    let db = store.conn();
    let news = fixtures::category(db, "News", true).await;
    let misc = fixtures::category(db, "Misc", true).await;
    let first = fixtures::post(db, news.id, "First", true, 3).await;
    let other = fixtures::post(db, misc.id, "Elsewhere", true, 10).await;
    let second = fixtures::post(db, news.id, "Second", true, 0).await;
    let third = fixtures::post(db, news.id, "Third", true, 0).await;
    let rust = fixtures::tag(db, "Rust", true).await;
    let web = fixtures::tag(db, "Web", true).await;
    fixtures::tag_post(db, first.id, &[rust.id, web.id]).await;

    let counts: Vec<(i32, i64)> = PostQuery::new()
        .annotate_total_tags()
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|p| (p.post.id, p.tags_count))
        .collect();
    assert_eq!(counts, [(first.id, 2), (other.id, 0), (second.id, 0), (third.id, 0)]);

    let ages = PostQuery::new().annotate_published_since().all(db).await.unwrap();
    assert_eq!(ages[0].days_since_published, 3);
    assert_eq!(ages[1].days_since_published, 10);

    let recency: Vec<bool> = PostQuery::new()
        .annotate_is_recent()
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.is_recent)
        .collect();
    assert_eq!(recency, [true, false, true, true]);

    let narrow = PostQuery::new().annotate_is_recent_within(1).all(db).await.unwrap();
    assert!(!narrow[0].is_recent);

    let neighbours = PostQuery::new()
        .filter_by_category("news")
        .annotate_next_and_prev()
        .all(db)
        .await
        .unwrap();
    let links: Vec<(Option<&str>, Option<&str>)> = neighbours
        .iter()
        .map(|p| (p.prev_post_slug.as_deref(), p.next_post_slug.as_deref()))
        .collect();
    assert_eq!(
        links,
        [
            (None, Some("second")),
            (Some("first"), Some("third")),
            (Some("second"), None),
        ]
    );
}

#[tokio::test]
async fn test_date_and_recency_filters() {
    let store = fixtures::store().await;
    let db = store.conn();
    let news = fixtures::category(db, "News", true).await;
    let old = fixtures::post(db, news.id, "Old", true, 30).await;
    let mid = fixtures::post(db, news.id, "Mid", true, 5).await;
    let fresh = fixtures::post(db, news.id, "Fresh", true, 0).await;

    let recent = PostQuery::new().filter_new_posts(7).all(db).await.unwrap();
    assert_eq!(ids(&recent, |p| p.id), [mid.id, fresh.id]);

    let range = PostQuery::new()
        .filter_in_date_range(old.created_at, mid.created_at)
        .all(db)
        .await
        .unwrap();
    assert_eq!(ids(&range, |p| p.id), [old.id, mid.id]);

    let inverted = PostQuery::new()
        .filter_in_date_range(mid.created_at, old.created_at)
        .count(db)
        .await
        .unwrap();
    assert_eq!(inverted, 0);

    let newest = PostQuery::new()
        .filter_recent_posts(2, Some(fresh.id))
        .all(db)
        .await
        .unwrap();
    let mut newest_ids = ids(&newest, |p| p.id);
    newest_ids.sort_unstable();
    assert_eq!(newest_ids, [old.id, mid.id]);

    let (page, total) = PostQuery::new().page(db, 1, 2).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(ids(&page, |p| p.id), [fresh.id]);
    assert!(PostQuery::new().filter_published(false).exists(db).await.is_ok_and(|e| !e));
}

#[tokio::test]
async fn test_pages_past_the_end_are_empty() {
    let store = fixtures::store().await;
    let db = store.conn();
    let news = fixtures::category(db, "News", true).await;
    fixtures::post(db, news.id, "Only", true, 0).await;
    fixtures::tag(db, "Lonely", true).await;

    for page in [1, 2, u64::MAX / 15, i64::MAX as u64, u64::MAX] {
        let (items, total) = PostQuery::new().page(db, page, 15).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 1);

        let (items, total) = PostQuery::new()
            .annotate_is_recent()
            .page(db, page, 15)
            .await
            .unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 1);

        let (items, _) = CategoryQuery::new().page(db, page, u64::MAX).await.unwrap();
        assert!(items.is_empty());
        let (items, _) = TagQuery::new().page(db, page, 2).await.unwrap();
        assert!(items.is_empty());
    }

    let (items, _) = CategoryQuery::new().page(db, 0, u64::MAX).await.unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn test_extreme_recency_windows() {
    let store = fixtures::store().await;
    let db = store.conn();
    let news = fixtures::category(db, "News", true).await;
    fixtures::post(db, news.id, "Ancient", true, 3_000).await;
    fixtures::post(db, news.id, "Today", true, 0).await;

    assert_eq!(PostQuery::new().filter_new_posts(i64::MAX).count(db).await.unwrap(), 2);
    assert_eq!(PostQuery::new().filter_new_posts(i64::MIN).count(db).await.unwrap(), 0);

    let flags: Vec<bool> = PostQuery::new()
        .annotate_is_recent_within(i64::MAX)
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.is_recent)
        .collect();
    assert_eq!(flags, [true, true]);

    let flags: Vec<bool> = PostQuery::new()
        .annotate_is_recent_within(i64::MIN)
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.is_recent)
        .collect();
    assert_eq!(flags, [false, false]);
}

#[tokio::test]
async fn test_eager_loading() {
    let store = fixtures::store().await;
    let db = store.conn();
    let news = fixtures::category(db, "News", true).await;
    let empty = fixtures::category(db, "Empty", true).await;
    let first = fixtures::post(db, news.id, "First", true, 0).await;
    let second = fixtures::post(db, news.id, "Second", true, 0).await;
    let rust = fixtures::tag(db, "Rust", true).await;
    fixtures::tag_post(db, first.id, &[rust.id]).await;

    let with_category = PostQuery::new().with_category(db).await.unwrap();
    assert!(with_category.iter().all(|(_, c)| c.id == news.id));

    let with_tags = PostQuery::new().with_tags(db).await.unwrap();
    assert_eq!(with_tags[0].1.len(), 1);
    assert_eq!(with_tags[0].1[0].slug, "rust");
    assert!(with_tags[1].1.is_empty());

    let with_posts = CategoryQuery::new().with_posts(db).await.unwrap();
    assert_eq!(with_posts[0].0.id, news.id);
    assert_eq!(ids(&with_posts[0].1, |p| p.id), [first.id, second.id]);
    assert_eq!(with_posts[1].0.id, empty.id);
    assert!(with_posts[1].1.is_empty());

    let recent = CategoryQuery::new()
        .filter_recent_categories(1, Some(empty.id))
        .all(db)
        .await
        .unwrap();
    assert_eq!(ids(&recent, |c| c.id), [news.id]);
}
