//! Request/response renderings for report attachments

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::client::{ExchangeRequest, ExchangeResponse};

/// Raw HTTP-style request text
pub(crate) fn plain_request(request: &ExchangeRequest) -> String {
    let mut out = format!("{} {}\n", request.method, request.url);
    push_plain_headers(&mut out, &request.headers);
    if let Some(body) = &request.body {
        out.push('\n');
        out.push_str(body);
        out.push('\n');
    }
    out
}

/// Raw HTTP-style response text
pub(crate) fn plain_response(response: &ExchangeResponse) -> String {
    let mut out = format!("HTTP {}\n", response.status);
    push_plain_headers(&mut out, &response.headers);
    out.push('\n');
    out.push_str(&response.body);
    out.push('\n');
    out
}

/// Markdown request card
pub(crate) fn render_request(request: &ExchangeRequest) -> String {
    let mut out = String::from("## Request\n\n");
    let _ = writeln!(out, "**{}** `{}`\n", request.method, request.url);
    push_header_table(&mut out, &request.headers);
    if let Some(body) = &request.body {
        out.push_str("\n### Body\n\n");
        push_code_block(&mut out, body);
    }
    out
}

/// Markdown response card
pub(crate) fn render_response(response: &ExchangeResponse) -> String {
    let mut out = String::from("## Response\n\n");
    let _ = writeln!(
        out,
        "**Status:** {} ({} ms)\n",
        response.status, response.elapsed_ms
    );
    push_header_table(&mut out, &response.headers);
    out.push_str("\n### Body\n\n");
    push_code_block(&mut out, &response.body);
    out
}

fn push_plain_headers(out: &mut String, headers: &BTreeMap<String, String>) {
    for (name, value) in headers {
        let _ = writeln!(out, "{}: {}", name, value);
    }
}

fn push_header_table(out: &mut String, headers: &BTreeMap<String, String>) {
    if headers.is_empty() {
        out.push_str("_No headers_\n");
        return;
    }
    out.push_str("| Header | Value |\n|---|---|\n");
    for (name, value) in headers {
        let _ = writeln!(out, "| {} | {} |", name, value.replace('|', "\\|"));
    }
}

/// Pretty-prints JSON bodies; anything else is shown verbatim
fn push_code_block(out: &mut String, body: &str) {
    let (lang, text) = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => (
            "json",
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
        ),
        Err(_) => ("text", body.to_string()),
    };
    let _ = writeln!(out, "```{}\n{}\n```", lang, text);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ExchangeRequest {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        ExchangeRequest {
            method: "POST".to_string(),
            url: "https://reqres.in/api/login".to_string(),
            headers,
            body: Some(r#"{"email":"eve.holt@reqres.in"}"#.to_string()),
        }
    }

    fn response() -> ExchangeResponse {
        ExchangeResponse {
            status: 400,
            content_type: Some("application/json".to_string()),
            headers: BTreeMap::new(),
            body: r#"{"error":"Missing password"}"#.to_string(),
            elapsed_ms: 12,
        }
    }

    #[test]
    fn test_plain_request() {
        let text = plain_request(&request());
        assert!(text.starts_with("POST https://reqres.in/api/login\n"));
        assert!(text.contains("content-type: application/json"));
        assert!(text.ends_with("{\"email\":\"eve.holt@reqres.in\"}\n"));
    }

    #[test]
    fn test_rendered_response_pretty_prints_json() {
        let text = render_response(&response());
        assert!(text.contains("**Status:** 400 (12 ms)"));
        assert!(text.contains("_No headers_"));
        assert!(text.contains("```json\n{\n  \"error\": \"Missing password\"\n}\n```"));
    }

    #[test]
    fn test_rendered_request_keeps_non_json_body() {
        let mut req = request();
        req.body = Some("not json".to_string());
        let text = render_request(&req);
        assert!(text.contains("| content-type | application/json |"));
        assert!(text.contains("```text\nnot json\n```"));
    }
}
