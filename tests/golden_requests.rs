//! Token totals for `gpt-4` (cl100k_base).
//!
//! Two kinds of fixture live here. Service totals are the prompt tokens the
//! chat-completion service reported for the same request; those tests say so
//! in a comment. Everything else is a snapshot of this crate's own output: it
//! catches unintended changes but not a rendering that was wrong to begin with.

use chat_token_counter::{
    ChatRequest, ChatResponse, Counter, Error, Message, ToolCall, ToolChoice, ToolDefinition,
};
use serde_json::json;

fn counter() -> Counter {
    Counter::new("gpt-4").unwrap()
}

fn weather_tool(unit_enum: &[&str], with_date: bool) -> ToolDefinition {
    let mut properties = json!({
        "location": {
            "type": "string",
            "description": "The city and state, e.g. San Francisco, CA"
        },
        "unit": {"type": "string", "enum": unit_enum}
    });
    if with_date {
        properties["date"] = json!({
            "type": "string",
            "description": "The date for which to get the weather."
        });
    }
    ToolDefinition::function(
        "get_current_weather",
        Some("Get the current weather in a given location."),
        json!({
            "type": "object",
            "properties": properties,
            "required": ["location"]
        }),
    )
}

fn integer_enum_tool() -> ToolDefinition {
    ToolDefinition::function(
        "integer_enum_example",
        Some("An example function that takes an integer enum."),
        json!({
            "type": "object",
            "properties": {"integer_enum": {"type": "integer", "enum": [1, 2, 3]}},
            "required": ["integer_enum"]
        }),
    )
}

fn weather_call(id: &str, location: &str) -> ToolCall {
    ToolCall::function(
        id,
        "get_current_weather",
        format!(r#"{{"location": "{}"}}"#, location),
    )
}

fn ski_message() -> Message {
    Message::user("I want to ski at Killington this weekend.")
}

// Service total.
#[test]
fn test_system_message_only() {
    let req = ChatRequest::new(vec![Message::system("This is a system message.")]);
    assert_eq!(counter().count_request(&req), 13);
}

// Service total.
#[test]
fn test_system_and_user_messages() {
    let req = ChatRequest::new(vec![
        Message::system("This is a system message."),
        Message::user("This is a user message."),
    ]);
    assert_eq!(counter().count_request(&req), 23);
}

// Service total.
#[test]
fn test_named_user_message() {
    let req = ChatRequest::new(vec![
        Message::system("This is a system message."),
        Message::user("This is a user message.").with_name("Chris"),
    ]);
    assert_eq!(counter().count_request(&req), 25);
}

// Service total.
#[test]
fn test_assistant_message_only() {
    let req = ChatRequest::new(vec![Message::assistant("This is an assistant message.")]);
    assert_eq!(counter().count_request(&req), 13);
}

// Service total.
#[test]
fn test_single_tool_without_system_message() {
    let req =
        ChatRequest::new(vec![ski_message()]).with_tools(vec![weather_tool(&["celsius", "fahrenheit"], false)]);
    assert_eq!(counter().count_request(&req), 84);
}

// Snapshot.
#[test]
fn test_single_tool_with_required_location_only() {
    let tool = ToolDefinition::function(
        "get_current_weather",
        Some("Get the current weather in a given location."),
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city and state, e.g. San Francisco, CA"
                }
            },
            "required": ["location"]
        }),
    );
    let req = ChatRequest::new(vec![ski_message()]).with_tools(vec![tool]);
    assert_eq!(counter().count_request(&req), 73);
}

// Service total.
#[test]
fn test_single_tool_appended_to_system_message() {
    let req = ChatRequest::new(vec![
        Message::system("You are a well-respected meteorologist."),
        ski_message(),
    ])
    .with_tools(vec![weather_tool(&["celcius", "fahrenheit"], false)]);
    assert_eq!(counter().count_request(&req), 94);
}

// Service total.
#[test]
fn test_two_tools_with_system_message() {
    let req = ChatRequest::new(vec![
        Message::system("You are a well-respected meteorologist."),
        ski_message(),
    ])
    .with_tools(vec![
        weather_tool(&["celcius", "fahrenheit"], true),
        integer_enum_tool(),
    ]);
    assert_eq!(counter().count_request(&req), 141);
}

// Snapshot.
#[test]
fn test_two_tools_without_system_message() {
    let req = ChatRequest::new(vec![ski_message()]).with_tools(vec![
        weather_tool(&["celcius", "fahrenheit"], true),
        integer_enum_tool(),
    ]);
    assert_eq!(counter().count_request(&req), 132);
}

// Service total.
#[test]
fn test_tool_call_and_tool_response() {
    let req = ChatRequest::new(vec![
        Message::user("I want to ski at Breckenridge this weekend."),
        Message::assistant("I can help with that.")
            .with_tool_calls(vec![weather_call("call_1", "Breckenridge, CO")]),
        Message::tool("call_1", "The weather in Breckenridge, CO is 38 degrees."),
    ]);
    assert_eq!(counter().count_request(&req), 70);
}

fn two_tool_responses() -> ChatRequest {
    ChatRequest::new(vec![
        Message::user("Should I ski at Killington or Tremblant this weekend?"),
        Message::assistant("").with_tool_calls(vec![
            weather_call("call_1", "Killington, VT"),
            weather_call("call_2", "Mount Tremblant, QC"),
        ]),
        Message::tool("call_1", "The weather in Killington, VT is 45 degrees."),
        Message::tool("call_2", "The weather at Mount Tremblant, QC is 32 degrees."),
    ])
}

// Snapshot.
#[test]
fn test_multiple_tool_responses_apply_flat_correction() {
    let c = counter();
    let req = two_tool_responses();
    let usage = c.request_usage(&req);
    assert_eq!(usage.total, 111);
    assert_eq!(usage.multi_tool_correction, 13);

    // A single tool response gets no correction.
    let mut single = req.clone();
    single.messages.pop();
    let usage = c.request_usage(&single);
    assert_eq!(usage.total, 80);
    assert_eq!(usage.multi_tool_correction, 0);

    // A third response does not scale it.
    let mut triple = req.clone();
    triple
        .messages
        .push(Message::tool("call_3", "The weather in Killington, VT is 45 degrees."));
    assert_eq!(c.request_usage(&triple).multi_tool_correction, 13);
}

// Snapshot.
#[test]
fn test_forced_tool_choice() {
    let req = ChatRequest::new(vec![Message::user(
        "I want to ski at either Killington or Vail this weekend.",
    )])
    .with_tools(vec![weather_tool(&["celsius", "fahrenheit"], false)])
    .with_tool_choice(ToolChoice::function("get_current_weather"));
    let usage = counter().request_usage(&req);
    assert_eq!(usage.tool_choice, 10);
    assert_eq!(usage.total, 98);
}

// Snapshot.
#[test]
fn test_response_with_tool_call() {
    let resp = ChatResponse::new(vec![Message::assistant(
        "Let's check the current weather at Killington, VT to help you decide if skiing this weekend is viable.",
    )
    .with_tool_calls(vec![ToolCall::function(
        "call_1",
        "get_current_weather",
        r#"{"location":"Killington, VT"}"#,
    )])]);
    assert_eq!(counter().count_response(&resp), 45);
}

// Snapshot.
#[test]
fn test_plain_response() {
    let resp = ChatResponse::new(vec![Message::assistant("How can I assist you today?")]);
    assert_eq!(counter().count_response(&resp), 7);
}

// Snapshot.
#[test]
fn test_tool_definitions_estimate() {
    assert_eq!(
        counter().count_tools(&[weather_tool(&["celsius", "fahrenheit"], false)]),
        66
    );
}

// Snapshot.
#[test]
fn test_malformed_arguments_are_not_fatal() {
    let msg = Message::assistant("").with_tool_calls(vec![ToolCall::function(
        "call_1",
        "get_current_weather",
        r#"{"location": "#,
    )]);
    assert_eq!(counter().count_message(&msg), 12);
}

// Service total (same request as test_tool_call_and_tool_response).
#[test]
fn test_recorded_wire_request() {
    let body = json!({
        "model": "gpt-4",
        "temperature": 0,
        "messages": [
            {"role": "user", "content": "I want to ski at Breckenridge this weekend."},
            {
                "role": "assistant",
                "content": "I can help with that.",
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {
                        "name": "get_current_weather",
                        "arguments": "{\"location\": \"Breckenridge, CO\"}"
                    }
                }]
            },
            {
                "role": "tool",
                "tool_call_id": "call_1",
                "content": "The weather in Breckenridge, CO is 38 degrees."
            }
        ]
    });
    let req: ChatRequest = serde_json::from_value(body).unwrap();
    assert_eq!(req.model.as_deref(), Some("gpt-4"));
    assert_eq!(counter().count_request(&req), 70);
}

// Snapshot.
#[test]
fn test_recorded_wire_response_with_null_content() {
    let body = json!({
        "model": "gpt-4",
        "choices": [{
            "index": 0,
            "finish_reason": "tool_calls",
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "get_current_weather", "arguments": "{\"location\": "}
                }]
            }
        }]
    });
    let resp: ChatResponse = serde_json::from_value(body).unwrap();
    // The malformed message counts 12 including one "assistant" role token.
    assert_eq!(counter().count_response(&resp), 11);
}

#[test]
fn test_count_request_does_not_mutate_input() {
    let c = counter();
    let req = ChatRequest::new(vec![
        Message::system("You are a well-respected meteorologist."),
        ski_message(),
    ])
    .with_tools(vec![weather_tool(&["celcius", "fahrenheit"], true)]);
    let before = req.clone();
    let first = c.count_request(&req);
    let second = c.count_request(&req);
    assert_eq!(first, second);
    assert_eq!(req, before);
    assert_eq!(
        req.messages[0].content,
        "You are a well-respected meteorologist."
    );
}

#[test]
fn test_unknown_model_fails_construction() {
    match Counter::new("not-a-real-model") {
        Err(Error::UnknownModel { model }) => assert_eq!(model, "not-a-real-model"),
        other => panic!("expected UnknownModel, got {:?}", other),
    }
}

#[test]
fn test_cached_counter_matches_uncached() {
    use chat_token_counter::CounterConfig;

    let cached = Counter::with_config("gpt-4", CounterConfig::new().with_cache_capacity(128)).unwrap();
    let req = two_tool_responses();
    assert_eq!(cached.count_request(&req), 111);
    assert_eq!(cached.count_request(&req), 111);
}

fn tool_result_request(user: &str, arguments: &str, result: &str) -> ChatRequest {
    ChatRequest::new(vec![
        Message::user(user),
        Message::assistant("").with_tool_calls(vec![ToolCall::function(
            "call_1",
            "get_current_weather",
            arguments,
        )]),
        Message::tool("call_1", result),
    ])
}

// JSON tool results are re-rendered as `{"k":v,...}` with no whitespace. The
// service totals for these requests were measured against a rendering with a
// space after every `:` and `,`, which costs one extra token per field. The
// assertions pin this crate's rendering; the service total is noted beside
// each one.
#[test]
fn test_json_tool_result_totals() {
    let c = counter();
    let cases = [
        (
            "I want to ski at Vail this weekend.",
            r#"{"location": "Vail, CO"}"#,
            r#"{"temperature": "35"}"#,
            49, // service: 50
        ),
        (
            "I want to ski at Park City this weekend.",
            r#"{"location": "Park City, UT"}"#,
            r#"{"location": "Park City, UT", "temperature": "45"}"#,
            56, // service: 59
        ),
        (
            "I want to ski at Whistler this weekend.",
            r#"{"location": "Whistler, BC"}"#,
            r#"{"location": "Whistler, BC", "format": "fahrenheit", "temperature": "45"}"#,
            64, // service: 69
        ),
        ("What's the weather?", "{}", "{}", 33), // service: 33
        (
            "What's the weather?",
            "{}",
            r#"{"temperature": "45"}"#,
            37, // service: 38
        ),
    ];
    for (user, arguments, result, want) in cases {
        let req = tool_result_request(user, arguments, result);
        assert_eq!(c.count_request(&req), want, "{}", result);
    }
}

#[test]
fn test_json_tool_result_spacing_costs_a_token() {
    let c = counter();
    assert_eq!(c.count_text("{\"temperature\":\"35\"}\n"), 5);
    assert_eq!(c.count_text("{\"temperature\": \"35\"}\n"), 6);
}
