/// JSON-RPC round trips through the MCP server
use hours_planner_mcp::mcp::protocol::error_codes;
use hours_planner_mcp::mcp::McpServer;
use hours_planner_mcp::*;
use serde_json::{json, Value};

fn seeded_server() -> McpServer {
    let store = SessionStore::with_seed_data(Session::new()).unwrap();
    McpServer::new(HoursPlannerServer::new(Box::new(store)))
}

async fn call(server: &mut McpServer, request: Value) -> Value {
    let response = server.handle_line(&request.to_string()).await.unwrap();
    serde_json::to_value(&response).unwrap()
}

async fn call_tool(server: &mut McpServer, name: &str, arguments: Value) -> Value {
    let response = call(
        server,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": name, "arguments": arguments}
        }),
    )
    .await;
    response["result"].clone()
}

/// Structured payload carried in the second content block
fn payload(result: &Value) -> Value {
    let text = result["content"][1]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn test_initialize_and_list_tools() {
    let mut server = seeded_server();

    let init = call(&mut server, json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"})).await;
    assert_eq!(init["result"]["protocol_version"], "2024-11-05");

    assert!(!server.is_initialized());
    let ack = server
        .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await;
    assert!(ack.is_none());
    assert!(server.is_initialized());

    let tools = call(&mut server, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await;
    let names: Vec<_> = tools["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["strategy_create", "strategy_list", "strategy_show", "strategy_update", "strategy_delete"]
    );

    let create_schema = &tools["result"]["tools"][0]["input_schema"];
    assert!(create_schema["properties"]["days_to_work"].is_object());
}

#[tokio::test]
async fn test_create_show_and_delete_through_tools() {
    let mut server = seeded_server();

    let created = call_tool(
        &mut server,
        "strategy_create",
        json!({
            "title": "Novel",
            "start_date": "2022/01/15",
            "target_date": "2024-01-15",
            "hours_left": 1200,
            "vacation_days": "40",
            "days_to_work": 5
        }),
    )
    .await;
    assert_eq!(created["is_error"], false);
    let strategy_id = payload(&created)["strategy"]["strategy_id"].as_str().unwrap().to_string();
    assert_eq!(payload(&created)["strategy"]["hours_per_day"], "2.50");

    let listed = call_tool(&mut server, "strategy_list", json!({})).await;
    assert_eq!(payload(&listed)["summary"]["total_strategies"], 3);

    let shown = call_tool(&mut server, "strategy_show", json!({"strategy_id": strategy_id})).await;
    assert_eq!(payload(&shown)["strategy"]["title"], "Novel");

    let deleted = call_tool(&mut server, "strategy_delete", json!({"strategy_id": strategy_id})).await;
    assert_eq!(deleted["is_error"], false);

    let again = call_tool(&mut server, "strategy_delete", json!({"strategy_id": strategy_id})).await;
    assert_eq!(again["is_error"], true);
    assert_eq!(again["error_code"], error_codes::STRATEGY_NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_and_invalid_input_are_tool_errors() {
    let mut server = seeded_server();

    let duplicate = call_tool(
        &mut server,
        "strategy_create",
        json!({
            "title": "My Strategy",
            "start_date": "2022-01-15",
            "target_date": "2024-01-15",
            "hours_left": "1200",
            "vacation_days": "40",
            "days_to_work": "5"
        }),
    )
    .await;
    assert_eq!(duplicate["is_error"], true);
    assert_eq!(duplicate["content"][0]["text"], "Error: The strategy title must be unique.");

    let invalid = call_tool(&mut server, "strategy_create", json!({"title": "Empty"})).await;
    assert_eq!(invalid["is_error"], true);
    assert_eq!(invalid["error_code"], error_codes::VALIDATION_ERROR);
}

#[tokio::test]
async fn test_update_reports_degenerate_schedule_as_warning() {
    let mut server = seeded_server();
    let listed = call_tool(&mut server, "strategy_list", json!({})).await;
    let strategy_id = payload(&listed)["strategies"][1]["strategy_id"].as_str().unwrap().to_string();

    let updated = call_tool(
        &mut server,
        "strategy_update",
        json!({
            "strategy_id": strategy_id,
            "start_date": "2022-01-15",
            "target_date": "2024-01-15",
            "hours_left": "1200",
            "vacation_days": "9000",
            "days_to_work": "5"
        }),
    )
    .await;

    assert_eq!(updated["is_error"], false);
    let body = payload(&updated);
    assert_eq!(body["strategy"]["vacation_days"], 9000);
    assert!(body["strategy"]["hours_per_day"].is_null());
    assert!(body["warning"].is_string());
}

#[tokio::test]
async fn test_protocol_errors() {
    let mut server = seeded_server();

    let garbage = server.handle_line("{not json").await.unwrap();
    assert_eq!(garbage.error.unwrap().code, error_codes::PARSE_ERROR);

    let unknown = call(&mut server, json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"})).await;
    assert_eq!(unknown["error"]["code"], error_codes::METHOD_NOT_FOUND);

    let old = call(&mut server, json!({"jsonrpc": "1.0", "id": 4, "method": "tools/list"})).await;
    assert_eq!(old["error"]["code"], error_codes::INVALID_REQUEST);

    assert!(server.handle_line("   ").await.is_none());
}

#[tokio::test]
async fn test_notifications_never_get_a_reply() {
    let mut server = seeded_server();

    assert!(server.handle_line(r#"{"jsonrpc":"2.0","method":"initialized"}"#).await.is_none());
    assert!(server
        .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{"requestId":7}}"#)
        .await
        .is_none());
    assert!(server.is_initialized());
}

#[tokio::test]
async fn test_whole_float_arguments_count_as_integers() {
    let mut server = seeded_server();

    let created = call_tool(
        &mut server,
        "strategy_create",
        json!({
            "title": "Floats",
            "start_date": "2022-01-15",
            "target_date": "2024-01-15",
            "hours_left": 1200.0,
            "vacation_days": 40.0,
            "days_to_work": 5.0
        }),
    )
    .await;
    assert_eq!(created["is_error"], false);
    assert_eq!(payload(&created)["strategy"]["hours_left"], 1200);
    assert_eq!(payload(&created)["strategy"]["hours_per_day"], "2.50");

    let fractional = call_tool(
        &mut server,
        "strategy_create",
        json!({
            "title": "Fractional",
            "start_date": "2022-01-15",
            "target_date": "2024-01-15",
            "hours_left": 1200.5,
            "vacation_days": 40,
            "days_to_work": 5
        }),
    )
    .await;
    assert_eq!(fractional["is_error"], true);
    assert_eq!(fractional["error_code"], error_codes::VALIDATION_ERROR);
}
