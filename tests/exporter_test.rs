//! End-to-end tests: mocked ESPN API → pipeline → `/metrics` text

use axum::{body::Body, http::Request};
use espn_ffl_exporter::{
    collect::{CycleKind, Pipeline},
    config::{AllowList, EspnSettings},
    espn::EspnClient,
    metrics::server::router,
    CoOwnerPolicy, EspnError, LeagueId, MetricStore, Season,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

async fn mock_espn() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/standings"))
        .and(query_param("leagueId", "365177"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "teams": [
                {
                    "teamId": 12,
                    "owners": [ { "firstName": "Leland", "lastName": "Someone" } ],
                    "record": { "overallWins": 5, "pointsFor": 620.4, "pointsAgainst": 580.1 }
                }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/scoreboard"))
        .and(query_param("leagueId", "365177"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "scoreboard": {
                "matchupPeriodId": 4,
                "matchups": [ { "teams": [ { "teamId": 12, "score": 101.5 } ] } ]
            }
        })))
        .mount(&server)
        .await;

    server
}

fn pipeline(server: &MockServer, allow: AllowList) -> Pipeline {
    let settings = EspnSettings {
        base_url: server.uri(),
        ..EspnSettings::default()
    };
    Pipeline::new(
        EspnClient::new(&settings).unwrap(),
        Arc::new(MetricStore::new().unwrap()),
        allow,
        Season::new(2018),
        CoOwnerPolicy::default(),
    )
}

async fn scrape(store: Arc<MetricStore>) -> String {
    let response = router(store)
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_allow_listed_league_is_exported() {
    let server = mock_espn().await;
    let pipeline = pipeline(&server, AllowList::of(&[365177]));

    assert!(pipeline.run_all(CycleKind::Season).await.is_success());
    assert!(pipeline.run_all(CycleKind::Live).await.is_success());

    let text = scrape(Arc::clone(pipeline.store())).await;
    assert!(text.contains(r#"wins{owner="Leland S"} 5"#));
    assert!(text.contains(r#"pointsFor{owner="Leland S"} 620.4"#));
    assert!(text.contains(r#"pointsAgainst{owner="Leland S"} 580.1"#));
    assert!(text.contains(r#"pointsWeek{owner="Leland S",week="4"} 101.5"#));
    assert!(text.contains("ffl_collection_last_success_timestamp_seconds"));
}

#[tokio::test]
async fn test_unlisted_league_exports_nothing() {
    let server = mock_espn().await;
    let pipeline = pipeline(&server, AllowList::of(&[1010746]));

    let season = pipeline.run_season(LeagueId::new(365177)).await.unwrap();
    let live = pipeline.run_live(LeagueId::new(365177)).await.unwrap();

    assert_eq!(season.updates, 0);
    assert_eq!(live.updates, 0);

    let text = scrape(Arc::clone(pipeline.store())).await;
    assert!(!text.contains("Leland S"));
}

#[tokio::test]
async fn test_private_league_is_access_denied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let pipeline = pipeline(&server, AllowList::of(&[365177]));
    let err = pipeline.run_season(LeagueId::new(365177)).await.unwrap_err();
    assert!(matches!(err, EspnError::AccessDenied { .. }));

    let summary = pipeline.run_all(CycleKind::Season).await;
    assert_eq!(summary.failures.len(), 1);

    let text = scrape(Arc::clone(pipeline.store())).await;
    assert!(text.contains("ffl_collection_failures_total"));
    assert!(!text.contains("wins{"));
    assert_eq!(
        pipeline.store().value(
            "ffl_collection_failures_total",
            &[("league", "365177"), ("cycle", "season"), ("kind", "access_denied")]
        ),
        Some(1.0)
    );
}
