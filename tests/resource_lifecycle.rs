use pdconf::framework::{Diagnostics, DynamicDataSource, DynamicResource, PlannedAction};
use pdconf::operations::Operation;
use pdconf::resources::{
    FailureLockoutAction, ListDataSource, ManagedResource, MonitorProvider, ObjectDataSource,
};
use pdconf::{ConfigClient, ProductVersion, ProviderContext};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn context(server: &MockServer, version: ProductVersion) -> ProviderContext {
    let client = ConfigClient::with_base_url(
        format!("{}/config", server.uri()),
        "cn=administrator".to_string(),
        "2FederateM0re".to_string(),
    )
    .unwrap();
    ProviderContext::new(client, version)
}

fn delay_bind_response(delay: &str) -> Value {
    json!({
        "schemas": ["urn:pingidentity:schemas:configuration:2.0:failure-lockout-action:delay-bind"],
        "id": "Delay Bind",
        "delay": delay,
        "allow-blocking-delay": false,
        "generate-account-status-notification": true
    })
}

fn disk_space_response(warning_percent: i64, alert_frequency: &str) -> Value {
    json!({
        "schemas": ["urn:pingidentity:schemas:configuration:2.0:monitor-provider:disk-space-usage"],
        "id": "Disk Space Usage",
        "enabled": true,
        "low-space-warning-percent-threshold": warning_percent,
        "low-space-error-percent-threshold": 5,
        "out-of-space-error-percent-threshold": 2,
        "alert-frequency": alert_frequency
    })
}

#[tokio::test]
async fn test_create_posts_add_request_and_keeps_configured_duration() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/config/failure-lockout-actions"))
        .and(body_json(json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:failure-lockout-action:delay-bind"],
            "id": "Delay Bind",
            "delay": "1 s",
            "allow-blocking-delay": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(delay_bind_response("1000 ms")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::new(FailureLockoutAction);
    let ctx = context(&mock_server, ProductVersion::V9_3);
    let plan = json!({
        "name": "Delay Bind",
        "type": "delay-bind",
        "delay": "1 s",
        "allow_blocking_delay": false
    });

    let mut diags = Diagnostics::new();
    let state = resource.create(&ctx, &plan, &mut diags).await.unwrap();
    assert!(diags.is_empty(), "unexpected diagnostics: {diags}");
    assert_eq!(state["id"], "Delay Bind");
    assert_eq!(state["delay"], "1 s");
    assert_eq!(state["generate_account_status_notification"], true);
    assert_eq!(state["description"], Value::Null);
    assert_eq!(state["notifications"], json!([]));
}

#[tokio::test]
async fn test_create_rejects_old_product_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::new(FailureLockoutAction);
    let ctx = context(&mock_server, ProductVersion::V9_1);
    let plan = json!({"name": "Lock", "type": "lock-account"});

    let mut diags = Diagnostics::new();
    assert!(resource.create(&ctx, &plan, &mut diags).await.is_none());
    let error = diags.errors().next().unwrap();
    assert_eq!(error.summary, "Unsupported product version");
    assert!(error.detail.contains("9.2.0.0"));
}

#[tokio::test]
async fn test_create_reports_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/config/monitor-providers"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "status": "409",
            "detail": "An entry with that name already exists"
        })))
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::new(MonitorProvider);
    let ctx = context(&mock_server, ProductVersion::V9_3);
    let plan = json!({"name": "Memory Usage", "type": "memory-usage", "enabled": true});

    let mut diags = Diagnostics::new();
    assert!(resource.create(&ctx, &plan, &mut diags).await.is_none());
    let error = diags.errors().next().unwrap();
    assert_eq!(
        error.summary,
        "An error occurred while creating the monitor_provider"
    );
    assert!(error.detail.contains("already exists"));
}

#[tokio::test]
async fn test_default_resource_adopts_and_patches_existing_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config/monitor-providers/Disk%20Space%20Usage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(disk_space_response(10, "1 d")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/config/monitor-providers/Disk%20Space%20Usage"))
        .and(body_json(json!({
            "operations": [
                {"op": "replace", "path": "low-space-warning-percent-threshold", "value": "20"},
                {"op": "replace", "path": "alert-frequency", "value": "24 h"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(disk_space_response(20, "1 d")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::default_object(MonitorProvider);
    assert_eq!(resource.type_name(), "pingdirectory_default_monitor_provider");
    let ctx = context(&mock_server, ProductVersion::V9_3);
    let plan = json!({
        "name": "Disk Space Usage",
        "type": "disk-space-usage",
        "enabled": true,
        "low_space_warning_percent_threshold": 20,
        "alert_frequency": "24 h"
    });

    let mut diags = Diagnostics::new();
    let change = resource.modify_plan(&plan, None, &mut diags).unwrap();
    assert_eq!(change.action, PlannedAction::Adopt);

    let state = resource.create(&ctx, &plan, &mut diags).await.unwrap();
    assert!(diags.is_empty(), "unexpected diagnostics: {diags}");
    assert_eq!(state["low_space_warning_percent_threshold"], 20);
    assert_eq!(state["alert_frequency"], "24 h");
}

#[tokio::test]
async fn test_default_resource_adopt_without_changes_skips_patch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config/monitor-providers/Disk%20Space%20Usage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(disk_space_response(10, "1 d")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::default_object(MonitorProvider);
    let ctx = context(&mock_server, ProductVersion::V9_3);
    let plan = json!({"name": "Disk Space Usage", "type": "disk-space-usage", "enabled": true});

    let mut diags = Diagnostics::new();
    let state = resource.create(&ctx, &plan, &mut diags).await.unwrap();
    assert_eq!(state["alert_frequency"], "1 d");
}

#[tokio::test]
async fn test_default_resource_type_mismatch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config/monitor-providers/Disk%20Space%20Usage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(disk_space_response(10, "1 d")))
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::default_object(MonitorProvider);
    let ctx = context(&mock_server, ProductVersion::V9_3);
    let plan = json!({"name": "Disk Space Usage", "type": "memory-usage", "enabled": true});

    let mut diags = Diagnostics::new();
    assert!(resource.create(&ctx, &plan, &mut diags).await.is_none());
    assert_eq!(diags.errors().next().unwrap().summary, "Type mismatch");
}

#[tokio::test]
async fn test_read_missing_object_is_removed_with_warning() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config/failure-lockout-actions/Delay%20Bind"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::new(FailureLockoutAction);
    let ctx = context(&mock_server, ProductVersion::V9_3);
    let state = json!({"id": "Delay Bind", "name": "Delay Bind", "type": "delay-bind", "delay": "1 s"});

    let mut diags = Diagnostics::new();
    assert!(resource.read(&ctx, &state, &mut diags).await.is_none());
    assert!(!diags.has_error());
    assert_eq!(diags.warnings().count(), 1);
}

#[tokio::test]
async fn test_read_keeps_equivalent_duration_from_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config/failure-lockout-actions/Delay%20Bind"))
        .respond_with(ResponseTemplate::new(200).set_body_json(delay_bind_response("1000 ms")))
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::new(FailureLockoutAction);
    let ctx = context(&mock_server, ProductVersion::V9_3);
    let state = json!({"id": "Delay Bind", "name": "Delay Bind", "type": "delay-bind", "delay": "1 s"});

    let mut diags = Diagnostics::new();
    let refreshed = resource.read(&ctx, &state, &mut diags).await.unwrap();
    assert_eq!(refreshed["delay"], "1 s");
    assert!(diags.is_empty());
}

#[tokio::test]
async fn test_read_reports_drift_without_warning() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config/failure-lockout-actions/Delay%20Bind"))
        .respond_with(ResponseTemplate::new(200).set_body_json(delay_bind_response("5 s")))
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::new(FailureLockoutAction);
    let ctx = context(&mock_server, ProductVersion::V9_3);
    let state = json!({"id": "Delay Bind", "name": "Delay Bind", "type": "delay-bind", "delay": "1 s"});

    let mut diags = Diagnostics::new();
    let refreshed = resource.read(&ctx, &state, &mut diags).await.unwrap();
    assert_eq!(refreshed["delay"], "5 s");
    assert!(diags.is_empty());
}

#[tokio::test]
async fn test_update_without_changes_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::new(FailureLockoutAction);
    let ctx = context(&mock_server, ProductVersion::V9_3);
    let plan = json!({"name": "Delay Bind", "type": "delay-bind", "delay": "1 s"});
    let state = json!({
        "id": "Delay Bind",
        "name": "Delay Bind",
        "type": "delay-bind",
        "delay": "1 s",
        "allow_blocking_delay": false
    });

    let mut diags = Diagnostics::new();
    let change = resource.modify_plan(&plan, Some(&state), &mut diags).unwrap();
    assert_eq!(change.action, PlannedAction::NoOp);

    let updated = resource.update(&ctx, &plan, &state, &mut diags).await.unwrap();
    assert_eq!(updated, state);
}

#[tokio::test]
async fn test_update_patches_changed_attributes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/config/failure-lockout-actions/Delay%20Bind"))
        .and(body_json(json!({
            "operations": [
                {"op": "replace", "path": "delay", "value": "2 s"},
                {"op": "replace", "path": "generate-account-status-notification", "value": "false"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:failure-lockout-action:delay-bind"],
            "id": "Delay Bind",
            "delay": "2 s",
            "allow-blocking-delay": false,
            "generate-account-status-notification": false
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::new(FailureLockoutAction);
    let ctx = context(&mock_server, ProductVersion::V9_3);
    let plan = json!({
        "name": "Delay Bind",
        "type": "delay-bind",
        "delay": "2 s",
        "generate_account_status_notification": false
    });
    let state = json!({
        "id": "Delay Bind",
        "name": "Delay Bind",
        "type": "delay-bind",
        "delay": "1 s",
        "generate_account_status_notification": true
    });

    let mut diags = Diagnostics::new();
    let change = resource.modify_plan(&plan, Some(&state), &mut diags).unwrap();
    assert_eq!(change.action, PlannedAction::Update);
    assert_eq!(
        change.operations,
        vec![
            Operation::replace("delay", "2 s"),
            Operation::replace("generate-account-status-notification", "false"),
        ]
    );

    let updated = resource.update(&ctx, &plan, &state, &mut diags).await.unwrap();
    assert_eq!(updated["delay"], "2 s");
    assert_eq!(updated["generate_account_status_notification"], false);
}

#[test]
fn test_modify_plan_type_change_requires_replace() {
    let resource = ManagedResource::new(FailureLockoutAction);
    let plan = json!({"name": "Lock", "type": "no-operation"});
    let state = json!({"id": "Lock", "name": "Lock", "type": "lock-account"});

    let mut diags = Diagnostics::new();
    let change = resource.modify_plan(&plan, Some(&state), &mut diags).unwrap();
    assert_eq!(change.action, PlannedAction::Replace);
    assert_eq!(change.requires_replace, vec!["type"]);
    assert!(change.operations.is_empty());
}

#[test]
fn test_modify_plan_name_change_requires_replace() {
    let resource = ManagedResource::new(FailureLockoutAction);
    let plan = json!({"name": "New Lock", "type": "lock-account"});
    let state = json!({"id": "Old Lock", "name": "Old Lock", "type": "lock-account"});

    let mut diags = Diagnostics::new();
    let change = resource.modify_plan(&plan, Some(&state), &mut diags).unwrap();
    assert_eq!(change.action, PlannedAction::Replace);
    assert_eq!(change.requires_replace, vec!["name"]);
}

#[tokio::test]
async fn test_create_with_empty_description_converges() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/config/failure-lockout-actions"))
        .and(body_json(json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:failure-lockout-action:lock-account"],
            "id": "Lock"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:failure-lockout-action:lock-account"],
            "id": "Lock"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::new(FailureLockoutAction);
    let ctx = context(&mock_server, ProductVersion::V9_3);
    let plan = json!({"name": "Lock", "type": "lock-account", "description": ""});

    let mut diags = Diagnostics::new();
    let state = resource.create(&ctx, &plan, &mut diags).await.unwrap();
    assert_eq!(state["description"], "");

    let change = resource.modify_plan(&plan, Some(&state), &mut diags).unwrap();
    assert_eq!(change.action, PlannedAction::NoOp);
    assert!(change.operations.is_empty());
    assert!(diags.is_empty(), "unexpected diagnostics: {diags}");
}

#[test]
fn test_modify_plan_rejects_invalid_config() {
    let resource = ManagedResource::new(FailureLockoutAction);
    let plan = json!({"name": "Lock", "type": "lock-account", "delay": "1 s"});

    let mut diags = Diagnostics::new();
    assert!(resource.modify_plan(&plan, None, &mut diags).is_none());
    assert!(diags.has_error());
}

#[tokio::test]
async fn test_delete_tolerates_missing_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/config/failure-lockout-actions/Lock"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::new(FailureLockoutAction);
    let ctx = context(&mock_server, ProductVersion::V9_3);
    let state = json!({"id": "Lock", "name": "Lock", "type": "lock-account"});

    let mut diags = Diagnostics::new();
    resource.delete(&ctx, &state, &mut diags).await;
    assert!(diags.is_empty());
}

#[tokio::test]
async fn test_delete_reports_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/config/failure-lockout-actions/Lock"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::new(FailureLockoutAction);
    let ctx = context(&mock_server, ProductVersion::V9_3);
    let state = json!({"id": "Lock", "name": "Lock", "type": "lock-account"});

    let mut diags = Diagnostics::new();
    resource.delete(&ctx, &state, &mut diags).await;
    assert!(diags.has_error());
}

#[tokio::test]
async fn test_default_delete_leaves_object_on_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::default_object(MonitorProvider);
    let ctx = context(&mock_server, ProductVersion::V9_3);
    let state = json!({"id": "Memory Usage", "name": "Memory Usage", "type": "memory-usage", "enabled": true});

    let mut diags = Diagnostics::new();
    resource.delete(&ctx, &state, &mut diags).await;
    assert!(diags.is_empty());
}

#[tokio::test]
async fn test_import_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config/failure-lockout-actions/Delay%20Bind"))
        .respond_with(ResponseTemplate::new(200).set_body_json(delay_bind_response("1 s")))
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::new(FailureLockoutAction);
    let ctx = context(&mock_server, ProductVersion::V9_3);

    let mut diags = Diagnostics::new();
    let state = resource
        .import_state(&ctx, "Delay Bind", &mut diags)
        .await
        .unwrap();
    assert_eq!(state["name"], "Delay Bind");
    assert_eq!(state["type"], "delay-bind");
    assert_eq!(state["delay"], "1 s");
}

#[tokio::test]
async fn test_import_rejects_old_product_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&mock_server)
        .await;

    let resource = ManagedResource::new(FailureLockoutAction);
    let ctx = context(&mock_server, ProductVersion::V9_1);

    let mut diags = Diagnostics::new();
    assert!(resource.import_state(&ctx, "Delay Bind", &mut diags).await.is_none());
    let error = diags.errors().next().unwrap();
    assert_eq!(error.summary, "Unsupported product version");
}

#[tokio::test]
async fn test_object_data_source() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config/monitor-providers/Disk%20Space%20Usage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(disk_space_response(10, "1 d")))
        .mount(&mock_server)
        .await;

    let data_source = ObjectDataSource(MonitorProvider);
    assert_eq!(data_source.type_name(), "pingdirectory_monitor_provider");
    let ctx = context(&mock_server, ProductVersion::V9_3);

    let mut diags = Diagnostics::new();
    let result = data_source
        .read(&ctx, &json!({"name": "Disk Space Usage"}), &mut diags)
        .await
        .unwrap();
    assert_eq!(result["type"], "disk-space-usage");
    assert_eq!(result["low_space_warning_percent_threshold"], 10);
}

#[tokio::test]
async fn test_list_data_source_with_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config/monitor-providers"))
        .and(query_param("filter", "enabled eq false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalResults": 1,
            "Resources": [{"id": "Stack Trace"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let data_source = ListDataSource(MonitorProvider);
    assert_eq!(data_source.type_name(), "pingdirectory_monitor_providers");
    let ctx = context(&mock_server, ProductVersion::V9_3);

    let mut diags = Diagnostics::new();
    let result = data_source
        .read(&ctx, &json!({"filter": "enabled eq false"}), &mut diags)
        .await
        .unwrap();
    assert_eq!(
        result,
        json!({"filter": "enabled eq false", "ids": ["Stack Trace"]})
    );
}
