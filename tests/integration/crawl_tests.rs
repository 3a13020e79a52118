//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the Weibo API and run both
//! crawls end-to-end through the HTTP fetcher.

use serde_json::{json, Value};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use weibo_spider::api::parse_base_url;
use weibo_spider::config::{
    ApiConfig, Config, CrawlerConfig, OutputConfig, RetryConfig, SeedsConfig, UserAgentConfig,
};
use weibo_spider::crawler::{
    build_http_client, run_crawl, Coordinator, FriendsSpider, HttpFetcher, RepostSpider,
};
use weibo_spider::output::MemorySink;
use weibo_spider::{Item, SpiderError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "2.00test-token";

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

fn fetcher_for(server: &MockServer) -> HttpFetcher {
    let client = build_http_client(&user_agent(), Duration::from_secs(5)).unwrap();
    let base_url = parse_base_url(&format!("{}/2/", server.uri())).unwrap();
    HttpFetcher::new(client, base_url, Some(TOKEN.to_string()))
}

fn seeds(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn user_json(id: i64) -> Value {
    json!({
        "id": id,
        "idstr": id.to_string(),
        "name": format!("user{}", id),
        "gender": "f",
        "province": "44",
        "city": "1",
        "location": "广东 广州",
        "description": "",
        "verified": false,
        "followers_count": 10,
        "friends_count": 5,
        "statuses_count": 99,
        "bi_followers_count": 2,
        "profile_image_url": "http://tp2.sinaimg.cn/1/50/0/0"
    })
}

fn post_json(id: i64, reposts_count: u64) -> Value {
    json!({
        "created_at": "Sat Jan 12 10:19:34 +0800 2013",
        "id": id,
        "mid": id.to_string(),
        "text": "转发",
        "source": "<a href=\"http://weibo.com/\">微博 weibo.com</a>",
        "reposts_count": reposts_count,
        "comments_count": 0,
        "attitudes_count": 0,
        "geo": null,
        "user": user_json(id + 1)
    })
}

fn ok_json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

#[tokio::test]
async fn test_friends_crawl_walks_cursor_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/users/show.json"))
        .and(query_param("uid", "123"))
        .and(query_param("access_token", TOKEN))
        .respond_with(ok_json(user_json(123)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/friendships/friends/ids.json"))
        .and(query_param("uid", "123"))
        .and(query_param("cursor", "0"))
        .and(query_param("count", "5000"))
        .respond_with(ok_json(json!({"ids": [1, 2, 3], "next_cursor": 50, "previous_cursor": 0})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/friendships/friends/ids.json"))
        .and(query_param("cursor", "50"))
        .respond_with(ok_json(json!({"ids": [4, 5], "next_cursor": 0, "previous_cursor": 50})))
        .expect(1)
        .mount(&server)
        .await;

    let mut coordinator =
        Coordinator::new(FriendsSpider::default(), fetcher_for(&server), MemorySink::new());
    coordinator.run(&seeds(&["123"])).await.unwrap();

    match coordinator.sink().items() {
        [Item::User(user)] => {
            assert_eq!(user.id, 123);
            assert_eq!(user.friends, Some(vec![1, 2, 3, 4, 5]));
        }
        other => panic!("expected one user, got {:?}", other),
    }
}

#[tokio::test]
async fn test_repost_crawl_requests_ceil_pages() {
    let server = MockServer::start().await;

    let mut source = post_json(3500000000000001, 450);
    source["retweeted_status"] = json!({"deleted": "1", "idstr": "0", "text": "此微博已被作者删除。"});

    Mock::given(method("GET"))
        .and(path("/2/statuses/show.json"))
        .and(query_param("id", "3500000000000001"))
        .respond_with(ok_json(source))
        .expect(1)
        .mount(&server)
        .await;

    for page in 1..=3i64 {
        let reposts: Vec<Value> = (0..2).map(|i| post_json(page * 100 + i, 0)).collect();
        Mock::given(method("GET"))
            .and(path("/2/statuses/repost_timeline.json"))
            .and(query_param("page", page.to_string()))
            .and(query_param("count", "200"))
            .respond_with(ok_json(json!({"reposts": reposts, "total_number": 450})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut coordinator =
        Coordinator::new(RepostSpider::default(), fetcher_for(&server), MemorySink::new())
            .with_max_in_flight(4);
    coordinator.run(&seeds(&["3500000000000001"])).await.unwrap();

    assert_eq!(coordinator.statistics().requests, 4);
    match coordinator.sink().items() {
        [Item::Post(post)] => {
            let ids: Vec<i64> = post.reposts.iter().map(|r| r.id).collect();
            assert_eq!(ids, vec![100, 101, 200, 201, 300, 301]);
            assert!(post.retweeted_status.is_none());
            assert_eq!(post.user.id, 3500000000000002);
        }
        other => panic!("expected one post, got {:?}", other),
    }
}

#[tokio::test]
async fn test_incomplete_entity_fetched_three_times() {
    let server = MockServer::start().await;

    let mut incomplete = user_json(9);
    incomplete.as_object_mut().unwrap().remove("followers_count");

    Mock::given(method("GET"))
        .and(path("/2/users/show.json"))
        .respond_with(ok_json(incomplete))
        .expect(3)
        .mount(&server)
        .await;

    let mut coordinator =
        Coordinator::new(FriendsSpider::default(), fetcher_for(&server), MemorySink::new());
    coordinator.run(&seeds(&["9"])).await.unwrap();

    assert!(coordinator.sink().is_empty());
    assert_eq!(coordinator.statistics().dropped, 1);
}

#[tokio::test]
async fn test_empty_page_fetched_four_times_then_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/statuses/show.json"))
        .respond_with(ok_json(post_json(42, 300)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/statuses/repost_timeline.json"))
        .and(query_param("page", "1"))
        .respond_with(ok_json(json!({"reposts": [], "total_number": 300})))
        .expect(4)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/statuses/repost_timeline.json"))
        .and(query_param("page", "2"))
        .respond_with(ok_json(json!({"reposts": [post_json(7, 0)]})))
        .expect(1)
        .mount(&server)
        .await;

    let mut coordinator =
        Coordinator::new(RepostSpider::default(), fetcher_for(&server), MemorySink::new());
    coordinator.run(&seeds(&["42"])).await.unwrap();

    match coordinator.sink().items() {
        [Item::Post(post)] => {
            assert_eq!(post.reposts.len(), 1);
            assert_eq!(post.reposts[0].id, 7);
        }
        other => panic!("expected one post, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fatal_error_code_aborts_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/users/show.json"))
        .and(query_param("uid", "1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": "expired_token",
            "error_code": 21315,
            "request": "/2/users/show.json"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/users/show.json"))
        .and(query_param("uid", "2"))
        .respond_with(ok_json(user_json(2)))
        .expect(0)
        .mount(&server)
        .await;

    let mut coordinator =
        Coordinator::new(FriendsSpider::default(), fetcher_for(&server), MemorySink::new())
            .with_max_in_flight(1);
    let err = coordinator.run(&seeds(&["1", "2"])).await.unwrap_err();

    assert!(matches!(err, SpiderError::FatalApiError { code: 21315, .. }));
    assert!(coordinator.sink().is_empty());
}

#[tokio::test]
async fn test_bad_gateway_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/users/show.json"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/users/show.json"))
        .respond_with(ok_json(user_json(5)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/friendships/friends/ids.json"))
        .respond_with(ok_json(json!({"ids": [], "next_cursor": 0})))
        .mount(&server)
        .await;

    let mut coordinator =
        Coordinator::new(FriendsSpider::default(), fetcher_for(&server), MemorySink::new());
    coordinator.run(&seeds(&["5"])).await.unwrap();

    assert_eq!(coordinator.statistics().retries, 1);
    match coordinator.sink().items() {
        [Item::User(user)] => assert_eq!(user.friends, Some(vec![])),
        other => panic!("expected one user, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_fatal_error_code_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/users/show.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "system error!",
            "error_code": 20101,
            "request": "/2/users/show.json"
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/users/show.json"))
        .respond_with(ok_json(user_json(6)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/friendships/friends/ids.json"))
        .respond_with(ok_json(json!({"ids": [8], "next_cursor": 0})))
        .mount(&server)
        .await;

    let mut coordinator =
        Coordinator::new(FriendsSpider::default(), fetcher_for(&server), MemorySink::new());
    coordinator.run(&seeds(&["6"])).await.unwrap();

    let stats = coordinator.statistics();
    assert!(!stats.aborted);
    assert_eq!(stats.retries, 1);
    match coordinator.sink().items() {
        [Item::User(user)] => assert_eq!(user.friends, Some(vec![8])),
        other => panic!("expected one user, got {:?}", other),
    }
}

#[tokio::test]
async fn test_run_crawl_writes_json_lines() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let items_path = dir.path().join("items.jsonl");

    Mock::given(method("GET"))
        .and(path("/2/statuses/show.json"))
        .and(query_param("id", "11"))
        .respond_with(ok_json(post_json(11, 0)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/statuses/show.json"))
        .and(query_param("id", "12"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&server)
        .await;

    let config = Config {
        api: ApiConfig {
            base_url: format!("{}/2", server.uri()),
            access_token: Some(TOKEN.to_string()),
            timeout_secs: 5,
        },
        user_agent: user_agent(),
        crawler: CrawlerConfig {
            max_concurrent_requests: 2,
        },
        retry: RetryConfig::default(),
        seeds: SeedsConfig::default(),
        output: OutputConfig {
            items_path: items_path.to_str().unwrap().to_string(),
        },
    };

    let stats = run_crawl(
        RepostSpider::default(),
        &config,
        &seeds(&["11", "12"]),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    // Seed 12 is not found: fetched three times, then dropped
    assert_eq!(stats.posts_emitted, 1);
    assert_eq!(stats.dropped, 1);

    let content = std::fs::read_to_string(&items_path).unwrap();
    let lines: Vec<Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["kind"], "post");
    assert_eq!(lines[0]["id"], 11);
    assert_eq!(lines[0]["timestamp"], 1357957174);
}
