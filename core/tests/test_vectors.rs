//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Results are compared as decoded values, so
//! field order in the fixtures does not matter.

use buzzsprout_core::{BuzzsproutClient, ClientConfig, Episode, HttpMethod, HttpResponse, NewEpisode};

const BASE_URL: &str = "https://www.buzzsprout.com/api";

fn client() -> BuzzsproutClient {
    BuzzsproutClient::from_config(ClientConfig::new("vector-key"))
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn cases(raw: &str) -> Vec<serde_json::Value> {
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_episode_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/create_episode.json")) {
        let name = case["name"].as_str().unwrap();
        let podcast_id = case["podcast_id"].as_u64().unwrap();
        let input: NewEpisode = serde_json::from_value(case["input"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        let req = c.build_create_episode(podcast_id, &input).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.header("authorization"), Some("Token token=vector-key"), "{name}: auth");
        assert_eq!(
            req.header("content-type"),
            expected_req["content_type"].as_str(),
            "{name}: content type"
        );

        let expected_fields: Vec<(String, String)> =
            serde_json::from_value(expected_req["fields"].clone()).unwrap();
        let fields: Vec<(String, String)> = url::form_urlencoded::parse(req.body.as_deref().unwrap())
            .into_owned()
            .collect();
        assert_eq!(fields, expected_fields, "{name}: form fields");

        let episode = c.parse_create_episode(simulated(&case)).unwrap();
        let expected: Episode = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(episode, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_episode_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/get_episode.json")) {
        let name = case["name"].as_str().unwrap();
        let podcast_id = case["podcast_id"].as_u64().unwrap();
        let episode_id = case["episode_id"].as_u64().unwrap();

        let req = c.build_get_episode(podcast_id, episode_id);
        assert_eq!(req.method, HttpMethod::Get, "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", case["expected_path"].as_str().unwrap()), "{name}: url");
        assert!(req.body.is_none(), "{name}: body");

        let result = c.parse_get_episode(simulated(&case));
        if let Some(status) = case.get("expected_error_status") {
            let err = result.unwrap_err();
            assert_eq!(err.status(), status.as_u64().map(|s| s as u16), "{name}: status");
            continue;
        }
        let expected: Option<Episode> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(result.unwrap(), expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_episodes_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/list_episodes.json")) {
        let name = case["name"].as_str().unwrap();
        let podcast_id = case["podcast_id"].as_u64().unwrap();

        let req = c.build_list_episodes(podcast_id);
        assert_eq!(req.method, HttpMethod::Get, "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", case["expected_path"].as_str().unwrap()), "{name}: url");

        let result = c.parse_list_episodes(simulated(&case));
        if let Some(status) = case.get("expected_error_status") {
            let err = result.unwrap_err();
            assert_eq!(err.status(), status.as_u64().map(|s| s as u16), "{name}: status");
            continue;
        }
        let expected: Vec<Episode> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(result.unwrap(), expected, "{name}: parsed result");
    }
}
