use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tower::util::ServiceExt;

use lingqian::handlers::{router, AppState};
use lingqian::{CorpusStore, OllamaClient};

const GUANYIN_FIXTURE: &str = "# 觀音靈籤\n\n---\n\n## 第 1 籤\n\n第一籤\n鍾離成道\n上上\n\n詩曰:\n開天闢地作良緣，\n吉日良時萬物全。\n本堂每日開放解籤\n【解曰】\n急速兆速\n【仙機】\n家宅安，自身平。\n";

const GUANDI_FIXTURE: &str = "# 關帝靈籤\n\n---\n\n## 第 1 籤\n\n第一籤\n大吉 甲甲\n漢高祖入關\n\n詩曰:\n巍巍獨步向雲間，\n玉殿千官第一班。\n請加解籤老師詢問\n【聖意】\n功名遂，福祿全。\n";

const JIAZI_FIXTURE: &str = "# 六十甲子籤\n\n---\n\n## 第一籤 甲子\n\n**屬金利秋宜其西方**\n\n### 籤詩原文\n\n```\n日出便見風雲散，\n光明清靜照世間。\n```\n\n### 解曰\n\n運勢如日初升。\n";

const LVZU_FIXTURE: &str = "# 呂祖靈籤\n\n---\n\n## 第1籤 甲子\n\n**典故**：伍子胥過昭關\n\n### 籤詩原文\n\n```\n天道盈虛自有常，\n人能得意便還鄉。\n```\n\n### 解曰\n\n否極泰來。\n";

fn make_state() -> AppState {
    let corpora = CorpusStore::from_entries([
        ("觀音靈籤.md", GUANYIN_FIXTURE.to_string()),
        ("關帝靈籤.md", GUANDI_FIXTURE.to_string()),
        ("六十甲子籤.md", JIAZI_FIXTURE.to_string()),
        ("呂祖靈籤.md", LVZU_FIXTURE.to_string()),
    ]);
    AppState {
        corpora: Arc::new(corpora),
        // unroutable backend so interpret calls fail fast as a gateway error
        ollama: Arc::new(OllamaClient::new("http://127.0.0.1:1", "test-model")),
    }
}

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(make_state());
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

async fn post_interpret(payload: serde_json::Value) -> StatusCode {
    let app = router(make_state());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/interpret")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

#[tokio::test]
async fn healthz_ok() {
    let app = router(make_state());
    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn systems_lists_all_five() {
    let (status, body) = get_json("/v1/systems").await;
    assert_eq!(status, StatusCode::OK);
    let systems = body.as_array().unwrap();
    assert_eq!(systems.len(), 5);
    let ids: Vec<&str> = systems
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"guanyin"));
    assert!(ids.contains(&"mazu"));
    assert!(systems.iter().all(|s| s["count"].as_u64().unwrap() > 0));
    let mazu = systems.iter().find(|s| s["id"] == "mazu").unwrap();
    assert_eq!(mazu["sexagenaryLabels"].as_array().unwrap().len(), 60);
}

#[tokio::test]
async fn stick_returns_full_record() {
    let (status, body) = get_json("/v1/sticks?system=guanyin&number=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["system"], "guanyin");
    assert_eq!(body["number"], 1);
    assert_eq!(body["displayLabel"], "第1籤");
    assert_eq!(body["rank"], "上上");
    assert_eq!(body["narrative"], "鍾離成道");
    assert_eq!(body["verseLines"][0], "開天闢地作良緣");
    assert_eq!(body["sections"]["仙機"], "家宅安，自身平。");
}

#[tokio::test]
async fn stick_rejects_unknown_system() {
    let (status, _) = get_json("/v1/sticks?system=wenchang&number=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stick_rejects_out_of_range_numbers() {
    let (low, _) = get_json("/v1/sticks?system=guandi&number=0").await;
    assert_eq!(low, StatusCode::BAD_REQUEST);
    let (high, _) = get_json("/v1/sticks?system=guandi&number=101").await;
    assert_eq!(high, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stick_in_range_but_absent_is_not_found() {
    // the fixture corpus only carries entry 1
    let (status, _) = get_json("/v1/sticks?system=guandi&number=50").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mazu_alias_serves_the_jiazi_corpus() {
    let (status, alias) = get_json("/v1/sticks?system=mazu&number=1").await;
    assert_eq!(status, StatusCode::OK);
    let (_, direct) = get_json("/v1/sticks?system=liushijiazi&number=1").await;
    assert_eq!(alias["system"], "mazu");
    assert_eq!(alias["verseLines"], direct["verseLines"]);
    assert_eq!(alias["displayLabel"], direct["displayLabel"]);
}

#[tokio::test]
async fn lvzu_record_carries_story_narrative() {
    let (status, body) = get_json("/v1/sticks?system=lvzu&number=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["narrative"], "伍子胥過昭關");
    assert_eq!(body["sections"]["解曰"], "否極泰來。");
}

#[tokio::test]
async fn interpret_requires_a_question() {
    let status = post_interpret(serde_json::json!({
        "system": "guanyin",
        "number": 1,
        "question": "   ",
    }))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn interpret_validates_before_contacting_the_backend() {
    let status = post_interpret(serde_json::json!({
        "system": "nothere",
        "number": 1,
        "question": "工作會順利嗎？",
    }))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn interpret_reports_unreachable_backend_as_gateway_error() {
    let status = post_interpret(serde_json::json!({
        "system": "guanyin",
        "number": 1,
        "question": "工作會順利嗎？",
    }))
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
