use miette::{IntoDiagnostic, Result};
use serde_json::json;
use time::{Duration, OffsetDateTime};
use tracing::info;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{any, body_partial_json, header, method, path, query_param},
};


use clockify_rs::{
    ApiError, ApiResponse, TimeEntryRequest, UpdateTimeEntryRequest,
    time_entry::ListParameters, utils::date_format::format_clockify_datetime,
};
use test_utils::{EchoTimeEntry, TIME_ENTRY_ID, USER_ID, WORKSPACE_ID};

fn time_entries_path() -> String {
    format!("/workspaces/{WORKSPACE_ID}/time-entries")
}

fn time_entry_path(id: &str) -> String {
    format!("/workspaces/{WORKSPACE_ID}/time-entries/{id}")
}

async fn mount_create(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(time_entries_path()))
        .and(header("X-Api-Key", test_utils::API_KEY))
        .respond_with(EchoTimeEntry {
            id: TIME_ENTRY_ID.to_string(),
            status: 201,
        })
        .mount(server)
        .await;
}

async fn received_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map_or(0, |requests| requests.len())
}

#[tokio::test]
async fn create_time_entry_returns_created_entry() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    mount_create(&server).await;
    let client = test_utils::create_test_client(&server)?;

    let now = OffsetDateTime::now_utc();
    let response = client
        .time_entries()
        .create(WORKSPACE_ID, &TimeEntryRequest::starting_at(now))
        .await?;

    assert!(response.is_successful());
    let entry = response.data().expect("created entry expected");
    assert_eq!(entry.id, TIME_ENTRY_ID);
    assert_eq!(entry.workspace_id, WORKSPACE_ID);
    assert!((entry.time_interval.start - now).abs() < Duration::seconds(1));
    Ok(())
}

#[tokio::test]
async fn create_time_entry_without_start_fails_before_dispatch() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let client = test_utils::create_test_client(&server)?;

    let request = TimeEntryRequest {
        description: Some("no start".to_string()),
        billable: Some(true),
        ..TimeEntryRequest::default()
    };
    let err = client
        .time_entries()
        .create(WORKSPACE_ID, &request)
        .await
        .expect_err("missing start must be rejected");

    assert_eq!(err.parameter(), Some("Start"));
    assert_eq!(
        err.to_string(),
        "Argument cannot be null. (Parameter 'Start')"
    );
    assert_eq!(received_count(&server).await, 0);
    Ok(())
}

#[tokio::test]
async fn get_time_entry_matches_created_entry() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    mount_create(&server).await;
    let client = test_utils::create_test_client(&server)?;

    let now = OffsetDateTime::now_utc();
    let created = client
        .time_entries()
        .create(WORKSPACE_ID, &TimeEntryRequest::starting_at(now))
        .await?
        .into_result()?;

    let stored_start = format_clockify_datetime(&now).into_diagnostic()?;
    Mock::given(method("GET"))
        .and(path(time_entry_path(&created.id)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(test_utils::time_entry_json(
                &created.id,
                &stored_start,
                false,
            )),
        )
        .mount(&server)
        .await;

    let fetched = client.time_entries().get(WORKSPACE_ID, &created.id).await?;
    assert!(fetched.is_successful());
    assert_eq!(fetched.data(), Some(&created));
    Ok(())
}

#[tokio::test]
async fn update_time_entry_sends_start_and_billable() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    let client = test_utils::create_test_client(&server)?;

    let now = OffsetDateTime::now_utc();
    let earlier = now - Duration::seconds(1);
    Mock::given(method("PUT"))
        .and(path(time_entry_path(TIME_ENTRY_ID)))
        .and(body_partial_json(json!({
            "start": format_clockify_datetime(&earlier).into_diagnostic()?,
            "billable": true
        })))
        .respond_with(EchoTimeEntry {
            id: TIME_ENTRY_ID.to_string(),
            status: 200,
        })
        .expect(1)
        .mount(&server)
        .await;

    let request = UpdateTimeEntryRequest {
        start: Some(earlier),
        billable: Some(true),
        ..UpdateTimeEntryRequest::default()
    };
    let response = client
        .time_entries()
        .update(WORKSPACE_ID, TIME_ENTRY_ID, &request)
        .await?;

    assert!(response.is_successful());
    assert!(response.data().is_some_and(|entry| entry.billable));
    Ok(())
}

#[tokio::test]
async fn update_time_entry_without_start_names_start() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    let client = test_utils::create_test_client(&server)?;

    for billable in [None, Some(true), Some(false)] {
        let request = UpdateTimeEntryRequest {
            start: None,
            billable,
            ..UpdateTimeEntryRequest::default()
        };
        let err = client
            .time_entries()
            .update(WORKSPACE_ID, "", &request)
            .await
            .expect_err("missing start must be rejected");
        assert_eq!(
            err.to_string(),
            "Argument cannot be null. (Parameter 'Start')"
        );
    }
    assert_eq!(received_count(&server).await, 0);
    Ok(())
}

#[tokio::test]
async fn update_time_entry_without_billable_names_billable() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    let client = test_utils::create_test_client(&server)?;

    let request = UpdateTimeEntryRequest {
        start: Some(OffsetDateTime::now_utc()),
        billable: None,
        ..UpdateTimeEntryRequest::default()
    };
    let err = client
        .time_entries()
        .update(WORKSPACE_ID, "", &request)
        .await
        .expect_err("missing billable must be rejected");

    assert_eq!(err.parameter(), Some("Billable"));
    assert_eq!(
        err.to_string(),
        "Argument cannot be null. (Parameter 'Billable')"
    );
    assert_eq!(received_count(&server).await, 0);
    Ok(())
}

#[tokio::test]
async fn delete_time_entry_then_get_fails() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    mount_create(&server).await;
    let client = test_utils::create_test_client(&server)?;

    let created = client
        .time_entries()
        .create(
            WORKSPACE_ID,
            &TimeEntryRequest::starting_at(OffsetDateTime::now_utc()),
        )
        .await?
        .into_result()?;

    Mock::given(method("DELETE"))
        .and(path(time_entry_path(&created.id)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(time_entry_path(&created.id)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "TimeEntry doesn't belong to Workspace",
            "code": 501
        })))
        .mount(&server)
        .await;

    let deleted = client
        .time_entries()
        .delete(WORKSPACE_ID, &created.id)
        .await?;
    assert!(deleted.is_successful());

    let fetched = client.time_entries().get(WORKSPACE_ID, &created.id).await?;
    assert!(!fetched.is_successful());
    assert!(matches!(
        fetched.failure(),
        Some(ApiError::NotFound { entity, .. }) if entity == "TimeEntryDto"
    ));
    Ok(())
}

#[tokio::test]
async fn delete_missing_time_entry_names_the_entry() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(time_entry_path(TIME_ENTRY_ID)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let client = test_utils::create_test_client(&server)?;

    let response = client
        .time_entries()
        .delete(WORKSPACE_ID, TIME_ENTRY_ID)
        .await?;

    assert!(matches!(
        response.failure(),
        Some(ApiError::NotFound { entity, .. }) if entity == "TimeEntryDto"
    ));
    Ok(())
}

#[tokio::test]
async fn entry_with_null_description_is_a_success() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    let mut body = test_utils::time_entry_json(TIME_ENTRY_ID, "2024-03-01T09:00:00Z", true);
    body["description"] = serde_json::Value::Null;
    body["billable"] = serde_json::Value::Null;
    Mock::given(method("GET"))
        .and(path(time_entry_path(TIME_ENTRY_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    let client = test_utils::create_test_client(&server)?;

    let entry = client
        .time_entries()
        .get(WORKSPACE_ID, TIME_ENTRY_ID)
        .await?
        .into_data()
        .expect("entry should decode");

    assert_eq!(entry.description, "");
    assert!(!entry.billable);
    Ok(())
}

#[tokio::test]
async fn find_all_time_entries_for_user_contains_created_entry() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    mount_create(&server).await;
    let client = test_utils::create_test_client(&server)?;

    let now = OffsetDateTime::now_utc();
    let created = client
        .time_entries()
        .create(WORKSPACE_ID, &TimeEntryRequest::starting_at(now))
        .await?
        .into_result()?;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": USER_ID,
            "email": "jane@example.com",
            "name": "Jane",
            "activeWorkspace": WORKSPACE_ID,
            "defaultWorkspace": WORKSPACE_ID,
            "status": "ACTIVE"
        })))
        .mount(&server)
        .await;

    let stored_start = format_clockify_datetime(&now).into_diagnostic()?;
    Mock::given(method("GET"))
        .and(path(format!(
            "/workspaces/{WORKSPACE_ID}/user/{USER_ID}/time-entries"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            test_utils::time_entry_json("64c777ddd3fcab07cfbb2000", "2024-03-01T09:00:00Z", true),
            test_utils::time_entry_json(&created.id, &stored_start, false),
        ])))
        .mount(&server)
        .await;

    let user = client.users().current().await?.into_result()?;
    let entries = client
        .time_entries()
        .find_all_for_user(WORKSPACE_ID, &user.id)
        .await?;

    assert!(entries.is_successful());
    let entries = entries.into_data().unwrap_or_default();
    info!("found {} time entries", entries.len());
    assert!(entries.contains(&created));
    Ok(())
}

#[tokio::test]
async fn find_all_time_entries_sends_filters() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!(
            "/workspaces/{WORKSPACE_ID}/user/{USER_ID}/time-entries"
        )))
        .and(query_param("in-progress", "false"))
        .and(query_param("page-size", "10"))
        .and(query_param("description", "planning"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let client = test_utils::create_test_client(&server)?;

    let parameters = ListParameters {
        description: Some("planning".to_string()),
        in_progress: Some(false),
        page_size: Some(10),
        ..ListParameters::default()
    };
    let entries = client
        .time_entries()
        .find_all_for_user_with(WORKSPACE_ID, USER_ID, &parameters)
        .await?;

    assert!(entries.is_successful());
    assert_eq!(entries.data().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn remote_errors_are_reported_in_the_envelope() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(time_entries_path()))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Project is required",
            "code": 501
        })))
        .mount(&server)
        .await;
    let client = test_utils::create_test_client(&server)?;

    let response = client
        .time_entries()
        .create(
            WORKSPACE_ID,
            &TimeEntryRequest::starting_at(OffsetDateTime::now_utc()),
        )
        .await?;

    assert!(!response.is_successful());
    assert_eq!(response.status_code().map(|s| s.as_u16()), Some(400));
    match response {
        ApiResponse::Failure(ApiError::Api {
            body: Some(body), ..
        }) => {
            assert_eq!(body.message.as_deref(), Some("Project is required"));
            assert_eq!(body.code, Some(501));
        }
        other => panic!("expected API failure, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn malformed_success_body_is_a_failure() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(time_entry_path(TIME_ENTRY_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\": 42}"))
        .mount(&server)
        .await;
    let client = test_utils::create_test_client(&server)?;

    let response = client
        .time_entries()
        .get(WORKSPACE_ID, TIME_ENTRY_ID)
        .await?;

    assert!(matches!(
        response.failure(),
        Some(ApiError::Deserialization { response_body: Some(body), .. }) if body.contains("42")
    ));
    Ok(())
}

#[tokio::test]
async fn network_failure_is_reported_in_the_envelope() -> Result<()> {
    test_utils::do_setup();
    // Nothing listens on the port once the listener is dropped
    let listener = std::net::TcpListener::bind("127.0.0.1:0").into_diagnostic()?;
    let address = listener.local_addr().into_diagnostic()?;
    drop(listener);
    let client = test_utils::create_client_for(&format!("http://{address}"))?;

    let response = client
        .time_entries()
        .delete(WORKSPACE_ID, TIME_ENTRY_ID)
        .await?;

    assert!(!response.is_successful());
    assert!(matches!(response.failure(), Some(ApiError::Transport { .. })));
    assert!(response.status_code().is_none());
    Ok(())
}

#[tokio::test]
async fn concurrent_calls_are_independent() -> Result<()> {
    test_utils::do_setup();
    let server = MockServer::start().await;
    mount_create(&server).await;
    let client = test_utils::create_test_client(&server)?;

    let now = OffsetDateTime::now_utc();
    let first = TimeEntryRequest::starting_at(now);
    let second = TimeEntryRequest::starting_at(now - Duration::hours(1));
    let api = client.time_entries();
    let (a, b) = tokio::join!(
        api.create(WORKSPACE_ID, &first),
        api.create(WORKSPACE_ID, &second),
    );

    let a = a?.into_result()?;
    let b = b?.into_result()?;
    assert!((a.time_interval.start - now).abs() < Duration::seconds(1));
    assert!((b.time_interval.start - (now - Duration::hours(1))).abs() < Duration::seconds(1));
    assert_eq!(received_count(&server).await, 2);
    Ok(())
}
