use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Prefixes and markers after which a token is treated as a secret.
const SECRET_MARKERS: [&str; 6] = [
    "sk-",
    "Bearer ",
    "bearer ",
    "api_key=",
    "\"api_key\":\"",
    "Incorrect API key provided: ",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '*')
}

/// Redact tokens that follow any known secret marker.
///
/// Upstream 401 bodies echo part of the key back, so error text is scrubbed
/// before it is logged or stored in an error.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    if !SECRET_MARKERS.iter().any(|m| input.contains(m)) {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in SECRET_MARKERS {
        let mut from = 0;
        while let Some(rel) = scrubbed[from..].find(marker) {
            let start = from + rel;
            let token_start = start + marker.len();
            let token_len: usize = scrubbed[token_start..]
                .chars()
                .take_while(|c| is_secret_char(*c))
                .map(char::len_utf8)
                .sum();

            if token_len == 0 {
                from = token_start;
                continue;
            }

            scrubbed.replace_range(start..token_start + token_len, REDACTED);
            from = start + REDACTED.len();
        }
    }

    Cow::Owned(scrubbed)
}

/// Scrub secrets and cap the length of upstream error text.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);
    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed.into_owned();
    }

    let truncated: String = scrubbed.chars().take(MAX_API_ERROR_CHARS).collect();
    format!("{truncated}...")
}
