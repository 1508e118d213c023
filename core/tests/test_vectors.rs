//! Verify store actions against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector describes the collection a store starts from, one action,
//! the request that action must send, a simulated response, and the
//! collection afterwards. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use resource_store::mock::MockTransport;
use resource_store::{ApiError, ClientConfig, HttpClient, HttpMethod, ResourceId, Todo, TodosStore};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000/api";

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn error_name(err: &ApiError) -> &'static str {
    match err {
        ApiError::NotFound => "NotFound",
        ApiError::HttpError { .. } => "HttpError",
        ApiError::Network(_) => "Network",
        ApiError::Timeout(_) => "Timeout",
        ApiError::DeserializationError(_) => "DeserializationError",
        ApiError::SerializationError(_) => "SerializationError",
        ApiError::InvalidConfig(_) => "InvalidConfig",
        ApiError::PartialDelete { .. } => "PartialDelete",
    }
}

#[tokio::test]
async fn todo_store_test_vectors() {
    let raw = include_str!("../../test-vectors/todos.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let mock = MockTransport::new();
        let store = TodosStore::new(HttpClient::new(ClientConfig::new(BASE_URL), mock.clone()));

        // Seed the store with a bare list.
        mock.expect(HttpMethod::Get, "/todos")
            .respond(200, &case["initial"].to_string());
        store.load_todos().await;
        assert!(store.error().is_none(), "{name}: seeding failed");

        // Queue the simulated response for the action under test.
        let expected_req = &case["expected_request"];
        let expected_path = expected_req["path"].as_str().unwrap();
        let method = parse_method(expected_req["method"].as_str().unwrap());
        let sim = &case["simulated_response"];
        mock.expect(method, expected_path)
            .respond(sim["status"].as_u64().unwrap() as u16, sim["body"].as_str().unwrap());

        // Run the action.
        let operation = &case["operation"];
        let kind = operation["kind"].as_str().unwrap();
        let result: Result<(), ApiError> = match kind {
            "load" => {
                store.load_todos().await;
                Ok(())
            }
            "create" => store.create(&operation["body"]).await.map(drop),
            "update" => {
                let id: ResourceId = serde_json::from_value(operation["id"].clone()).unwrap();
                store.update(&id, &operation["body"]).await.map(drop)
            }
            "delete" => {
                let id: ResourceId = serde_json::from_value(operation["id"].clone()).unwrap();
                store.delete(&id).await
            }
            other => panic!("{name}: unknown operation kind: {other}"),
        };

        // Verify the request.
        let requests = mock.requests();
        assert_eq!(requests.len(), 2, "{name}: request count");
        let req = &requests[1];
        assert_eq!(req.method, method, "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{expected_path}"), "{name}: url");
        let sent_body: Value = req
            .body
            .as_deref()
            .map(|body| serde_json::from_str(body).unwrap())
            .unwrap_or(Value::Null);
        assert_eq!(sent_body, expected_req["body"], "{name}: body");

        // Verify the outcome.
        match case.get("expected_error").and_then(Value::as_str) {
            Some(expected) if kind == "load" => {
                assert!(result.is_ok(), "{name}: load must not return errors");
                assert_eq!(store.error().as_deref(), Some(expected), "{name}: error");
            }
            Some(expected) => {
                let err = result.unwrap_err();
                assert_eq!(error_name(&err), expected, "{name}: error variant");
                assert!(store.error().is_some(), "{name}: error recorded");
            }
            None => {
                assert!(result.is_ok(), "{name}: {result:?}");
                assert!(store.error().is_none(), "{name}: no error expected");
            }
        }

        let expected_items: Vec<Todo> = serde_json::from_value(case["expected_items"].clone()).unwrap();
        assert_eq!(store.items(), expected_items, "{name}: items");
        assert!(!store.is_loading(), "{name}: busy flag cleared");
        mock.verify();
    }
}
