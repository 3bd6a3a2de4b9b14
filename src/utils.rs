pub fn verify_access_code(provided: &str, expected: &str) -> bool {
    // The configured code is compared as-is, nothing is hashed.
    provided == expected
}

pub fn is_valid_access_code(code: &str) -> bool {
    code.len() == 4 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Reduce a client supplied file name to a safe, single path component.
pub fn sanitize_file_name(original: &str) -> String {
    // browsers on Windows may send the full path
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(100)
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_owned()
    } else {
        trimmed.to_owned()
    }
}
