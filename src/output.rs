use crate::types::ParsedRequest;

/// Serialize a [`ParsedRequest`] to a JSON string.
///
/// A well-formed body is embedded as JSON, a malformed one as a string. When
/// `pretty` is `true` the output is indented for readability.
pub fn format_json(request: &ParsedRequest, pretty: bool) -> String {
    let result = if pretty {
        serde_json::to_string_pretty(request)
    } else {
        serde_json::to_string(request)
    };
    result.unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

/// Render a [`ParsedRequest`] in a human-readable debug format.
pub fn format_debug(request: &ParsedRequest) -> String {
    let mut out = String::with_capacity(256);

    out.push_str("=== Request Script ===\n");
    out.push_str(&format!("Method: {}\n", request.method()));
    out.push_str(&format!("URI:    {}\n", request.uri()));
    out.push_str(&format!("Host:   {}\n", request.host()));
    out.push_str(&format!("URL:    {}\n", request.url()));

    if request.has_body() {
        out.push_str(&format!("\n--- Body ({} bytes) ---\n", request.body().len()));
        out.push_str(request.body());
        out.push('\n');
        if let Err(e) = request.json() {
            out.push_str(&format!("!! {e}\n"));
        }
    } else {
        out.push_str("\n--- No Body ---\n");
    }

    out.push_str("======================\n");
    out
}

/// Render the method and full URL on one line.
pub fn format_line(request: &ParsedRequest) -> String {
    format!("{} {}\n", request.method(), request.url())
}

/// Render an equivalent `curl` command line.
///
/// The body is sent compacted when it is valid JSON and verbatim otherwise.
pub fn format_curl(request: &ParsedRequest) -> String {
    let mut out = format!(
        "curl -X {} {}",
        request.method(),
        shell_quote(&request.url())
    );

    if request.has_body() {
        let body = request
            .json()
            .unwrap_or_else(|_| request.body().to_owned());
        out.push_str(" -H 'Content-Type: application/json' -d ");
        out.push_str(&shell_quote(&body));
    }

    out.push('\n');
    out
}

/// Wrap `s` in single quotes for a POSIX shell.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
