/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin
/// 2. Routes tool calls to the strategy tools
/// 3. Sends JSON-RPC responses to stdout

use std::collections::HashMap;
use schemars::schema_for;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::mcp::protocol::*;
use crate::tools;
use crate::{HoursPlannerServer, ServerError};

/// MCP server that handles communication with a client
pub struct McpServer {
    /// The underlying planner
    planner: HoursPlannerServer,
    /// Whether the client has confirmed initialization
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(planner: HoursPlannerServer) -> Self {
        Self {
            planner,
            initialized: false,
        }
    }

    /// Whether the client sent `initialized`
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.handle_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Blank lines produce no response.
    pub async fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        // Notifications carry no id and never get a reply
        let id = match request.id {
            Some(ref id) => id.clone(),
            None => {
                self.handle_notification(&request.method);
                return None;
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version '{}'", request.jsonrpc),
                None,
            ));
        }

        Some(self.handle_request(id, request).await)
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "initialized" | "notifications/initialized" => {
                info!("MCP client finished initialization");
                self.initialized = true;
            }
            _ => debug!("Ignoring notification '{}'", method),
        }
    }

    async fn handle_request(&mut self, id: Value, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Hours Planner MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        json_response(id, &result)
    }

    fn handle_tools_list(&mut self, id: Value) -> JsonRpcResponse {
        let tools = vec![
            ToolDefinition {
                name: "strategy_create".to_string(),
                description: "Create a strategy and compute the hours per day it needs".to_string(),
                input_schema: schema_value(schema_for!(tools::CreateStrategyParams)),
            },
            ToolDefinition {
                name: "strategy_list".to_string(),
                description: "List all strategies sorted by title".to_string(),
                input_schema: json!({"type": "object", "properties": {}, "required": []}),
            },
            ToolDefinition {
                name: "strategy_show".to_string(),
                description: "Show one strategy with freshly computed hours per day".to_string(),
                input_schema: schema_value(schema_for!(tools::ShowStrategyParams)),
            },
            ToolDefinition {
                name: "strategy_update".to_string(),
                description: "Update a strategy's schedule and workload, then recompute hours per day".to_string(),
                input_schema: schema_value(schema_for!(tools::UpdateStrategyParams)),
            },
            ToolDefinition {
                name: "strategy_delete".to_string(),
                description: "Permanently delete a strategy".to_string(),
                input_schema: schema_value(schema_for!(tools::DeleteStrategyParams)),
            },
        ];

        JsonRpcResponse::success(id, json!({"tools": tools}))
    }

    async fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let args = tool_params.arguments;
        let result = match tool_params.name.as_str() {
            "strategy_create" => self.call_strategy_create(args).await,
            "strategy_list" => self.call_strategy_list().await,
            "strategy_show" => self.call_strategy_show(args).await,
            "strategy_update" => self.call_strategy_update(args).await,
            "strategy_delete" => self.call_strategy_delete(args).await,
            _ => ToolCallResult::error(
                error_codes::METHOD_NOT_FOUND,
                format!("Unknown tool: {}", tool_params.name),
            ),
        };

        json_response(id, &result)
    }

    async fn call_strategy_create(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = tools::CreateStrategyParams {
            title: arg_string(&args, "title"),
            start_date: arg_string(&args, "start_date"),
            target_date: arg_string(&args, "target_date"),
            hours_left: arg_string(&args, "hours_left"),
            vacation_days: arg_string(&args, "vacation_days"),
            days_to_work: arg_string(&args, "days_to_work"),
        };

        match tools::create_strategy(self.planner.store(), params).await {
            Ok(response) => {
                let message = format!(
                    "{}\n{}\nStrategy ID: {}",
                    response.message,
                    response.strategy.summary_line(),
                    response.strategy.strategy_id
                );
                tool_success(message, &response)
            }
            Err(e) => ToolCallResult::from_tool_error(&e),
        }
    }

    async fn call_strategy_list(&self) -> ToolCallResult {
        match tools::list_strategies(self.planner.store()).await {
            Ok(response) => {
                let message = if response.strategies.is_empty() {
                    "No strategies yet. Create one to see how many hours a day it takes!".to_string()
                } else {
                    let lines = response
                        .strategies
                        .iter()
                        .map(|s| format!("- {}", s.summary_line()))
                        .collect::<Vec<_>>()
                        .join("\n");
                    format!("Strategies ({}):\n{}", response.summary.total_strategies, lines)
                };
                tool_success(message, &response)
            }
            Err(e) => ToolCallResult::from_tool_error(&e),
        }
    }

    async fn call_strategy_show(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = tools::ShowStrategyParams {
            strategy_id: arg_string(&args, "strategy_id"),
        };

        match tools::show_strategy(self.planner.store(), params).await {
            Ok(response) => {
                let mut message = response.strategy.summary_line();
                if let Some(warning) = &response.warning {
                    message.push_str(&format!("\nWarning: {}", warning));
                }
                tool_success(message, &response)
            }
            Err(e) => ToolCallResult::from_tool_error(&e),
        }
    }

    async fn call_strategy_update(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = tools::UpdateStrategyParams {
            strategy_id: arg_string(&args, "strategy_id"),
            title: args.get("title").and_then(|v| v.as_str()).map(|s| s.to_string()),
            start_date: arg_string(&args, "start_date"),
            target_date: arg_string(&args, "target_date"),
            hours_left: arg_string(&args, "hours_left"),
            vacation_days: arg_string(&args, "vacation_days"),
            days_to_work: arg_string(&args, "days_to_work"),
        };

        match tools::update_strategy(self.planner.store(), params).await {
            Ok(response) => {
                let mut message = format!("{}\n{}", response.message, response.strategy.summary_line());
                if let Some(warning) = &response.warning {
                    message.push_str(&format!("\nWarning: {}", warning));
                }
                tool_success(message, &response)
            }
            Err(e) => ToolCallResult::from_tool_error(&e),
        }
    }

    async fn call_strategy_delete(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = tools::DeleteStrategyParams {
            strategy_id: arg_string(&args, "strategy_id"),
        };

        match tools::delete_strategy(self.planner.store(), params).await {
            Ok(response) => tool_success(response.message.clone(), &response),
            Err(e) => ToolCallResult::from_tool_error(&e),
        }
    }
}

/// Read an argument as form text; numbers are accepted and stringified
fn arg_string(args: &HashMap<String, Value>, key: &str) -> String {
    match args.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match (n.as_u64(), n.as_f64()) {
            (Some(whole), _) => whole.to_string(),
            // 1200.0 is still a whole number
            (None, Some(f)) if f.is_finite() && f.fract() == 0.0 => format!("{:.0}", f),
            _ => n.to_string(),
        },
        _ => String::new(),
    }
}

fn schema_value(schema: schemars::schema::RootSchema) -> Value {
    serde_json::to_value(schema).unwrap_or_else(|_| json!({"type": "object"}))
}

fn tool_success<T: Serialize>(message: String, payload: &T) -> ToolCallResult {
    match serde_json::to_value(payload) {
        Ok(value) => ToolCallResult::success(message, value),
        Err(e) => ToolCallResult::error(error_codes::INTERNAL_ERROR, e.to_string()),
    }
}

fn json_response<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
    }
}
