use std::io::{self, BufRead, Write};

use serde::Deserialize;
use serde_json::{json, Value};

use crate::insight::analysis;
use crate::insight::catalog::{self, DEFAULT_USERNAME};
use crate::insight::{InsightKind, MessageContext, TimeContext, Tone};

// Some tool-calling clients are strict about the server echoing a compatible
// protocol version; this stays at the widely deployed baseline.
const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "ocean-tasks-insight";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default, rename = "jsonrpc")]
    pub _jsonrpc: Option<String>,
    pub method: String,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub params: Option<Value>,
}

fn json_rpc_response(id: Option<Value>, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn json_rpc_error(id: Option<Value>, code: i64, message: &str) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
}

fn tool_text_result(text: &str, is_error: bool) -> Value {
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error
    })
}

#[derive(Debug, Deserialize)]
struct MessageArgs {
    context: MessageContext,
    #[serde(default)]
    days_overdue: i64,
    #[serde(default = "default_task_count")]
    task_count: u64,
}

fn default_task_count() -> u64 {
    1
}

#[derive(Debug, Deserialize)]
struct InsightArgs {
    insight_type: InsightKind,
    #[serde(default)]
    user_context: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PatternArgs {
    tasks: Vec<analysis::PatternInput>,
}

#[derive(Debug, Default, Deserialize)]
struct CustomMessageArgs {
    #[serde(default)]
    tone: Tone,
    #[serde(default)]
    task_title: Option<String>,
    #[serde(default)]
    time_context: Option<TimeContext>,
}

/// The insight service: the canned-message logic behind a tool-calling
/// protocol instead of HTTP.
#[derive(Default)]
pub struct InsightServer {
    initialized: bool,
}

impl InsightServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, request: JsonRpcRequest) -> Option<Value> {
        let method = request.method.as_str();

        if method == "initialize" {
            return Some(json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
                    "capabilities": { "tools": {} }
                }),
            ));
        }

        if !self.initialized && method != "notifications/initialized" {
            return Some(json_rpc_error(request.id, -32002, "Server not initialized"));
        }

        if method == "notifications/initialized" {
            self.initialized = true;
            return None;
        }

        if method == "ping" {
            return Some(json_rpc_response(request.id, json!({})));
        }

        if method == "tools/list" {
            return Some(json_rpc_response(
                request.id,
                json!({ "tools": tool_definitions() }),
            ));
        }

        if method == "tools/call" {
            let Some(params) = request.params.as_ref().and_then(|v| v.as_object()) else {
                return Some(json_rpc_error(request.id, -32602, "params must be an object"));
            };
            let tool_name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
            let args = params
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| json!({}));
            return Some(json_rpc_response(request.id, call_tool(tool_name, args)));
        }

        Some(json_rpc_error(
            request.id,
            -32601,
            &format!("Method not found: {}", method),
        ))
    }
}

fn call_tool(name: &str, args: Value) -> Value {
    let mut rng = rand::thread_rng();
    match name {
        "get_motivational_message" => match serde_json::from_value::<MessageArgs>(args) {
            Ok(args) => tool_text_result(
                &catalog::motivational_message(
                    args.context,
                    DEFAULT_USERNAME,
                    args.days_overdue,
                    args.task_count,
                    &mut rng,
                ),
                false,
            ),
            // An unknown context tag still answers with the fallback whisper.
            Err(_) => tool_text_result(
                "🌊 The ocean whispers: 'Keep flowing forward, one wave at a time!'",
                false,
            ),
        },
        "get_productivity_insight" => match serde_json::from_value::<InsightArgs>(args) {
            Ok(args) => tool_text_result(
                &catalog::productivity_insight(
                    args.insight_type,
                    args.user_context.as_deref(),
                    &mut rng,
                ),
                false,
            ),
            Err(_) => tool_text_result(
                "🌊 Like the endless ocean, there are infinite ways to improve productivity!",
                false,
            ),
        },
        "analyze_task_patterns" => match serde_json::from_value::<PatternArgs>(args) {
            Ok(args) => tool_text_result(
                &analysis::render_patterns(&args.tasks, chrono::Utc::now()),
                false,
            ),
            Err(e) => tool_text_result(&format!("tasks must be an array of task objects: {}", e), true),
        },
        "generate_custom_message" => {
            let args = serde_json::from_value::<CustomMessageArgs>(args).unwrap_or_default();
            tool_text_result(
                &catalog::custom_message(
                    args.tone,
                    args.task_title.as_deref(),
                    args.time_context,
                    &mut rng,
                ),
                false,
            )
        }
        _ => tool_text_result(
            &format!(
                "🌊 Unknown tool: {}. Like the vast ocean, there's always more to explore!",
                name
            ),
            true,
        ),
    }
}

fn tool_definitions() -> Value {
    json!([
        {
            "name": "get_motivational_message",
            "description": "Get a beach-themed motivational message based on task context",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "context": {
                        "type": "string",
                        "enum": ["overdue_gentle", "overdue_encouraging", "completion_celebration", "daily_motivation"],
                        "description": "The context for the motivational message"
                    },
                    "days_overdue": {
                        "type": "integer",
                        "description": "Number of days a task is overdue (optional)",
                        "minimum": 0
                    },
                    "task_count": {
                        "type": "integer",
                        "description": "Number of tasks in the context (optional)",
                        "minimum": 1
                    }
                },
                "required": ["context"]
            }
        },
        {
            "name": "get_productivity_insight",
            "description": "Get productivity tips and insights with ocean/beach theme",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "insight_type": {
                        "type": "string",
                        "enum": ["productivity_tips", "focus_techniques"],
                        "description": "Type of insight to provide"
                    },
                    "user_context": {
                        "type": "string",
                        "description": "Optional context about user's current situation"
                    }
                },
                "required": ["insight_type"]
            }
        },
        {
            "name": "analyze_task_patterns",
            "description": "Analyze task completion patterns and provide insights",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "tasks": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "id": { "type": "string" },
                                "title": { "type": "string" },
                                "completed": { "type": "boolean" },
                                "due_date": { "type": "string" },
                                "created_at": { "type": "string" },
                                "completed_at": { "type": "string" }
                            }
                        },
                        "description": "Array of task objects to analyze"
                    }
                },
                "required": ["tasks"]
            }
        },
        {
            "name": "generate_custom_message",
            "description": "Generate a custom motivational message with specific parameters",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "tone": {
                        "type": "string",
                        "enum": ["gentle", "encouraging", "celebratory", "calming"],
                        "description": "Tone of the message"
                    },
                    "task_title": {
                        "type": "string",
                        "description": "Specific task title to reference"
                    },
                    "time_context": {
                        "type": "string",
                        "enum": ["morning", "afternoon", "evening", "late_night"],
                        "description": "Time of day context"
                    }
                },
                "required": ["tone"]
            }
        }
    ])
}

/// Serve the tool-calling protocol over stdio, one JSON-RPC message per line.
pub fn run() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut server = InsightServer::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
            Ok(request) => server.handle(request),
            Err(e) => Some(json_rpc_error(None, -32700, &format!("Parse error: {}", e))),
        };
        if let Some(response) = response {
            let mut out = stdout.lock();
            writeln!(out, "{}", response)?;
            out.flush()?;
        }
    }

    Ok(())
}
