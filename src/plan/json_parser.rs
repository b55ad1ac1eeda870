use serde::de::DeserializeOwned;

/// Extract and parse the JSON object in an advisory response.
/// Handles markdown code fences, prose before/after, and nested braces.
pub fn extract_json<T: DeserializeOwned>(response: &str) -> Result<T, String> {
    let trimmed = response.trim();

    if let Ok(parsed) = serde_json::from_str::<T>(trimmed) {
        return Ok(parsed);
    }

    let cleaned = remove_markdown_blocks(trimmed);
    if let Ok(parsed) = serde_json::from_str::<T>(&cleaned) {
        return Ok(parsed);
    }

    if let Some(json_str) = find_json_object(&cleaned) {
        if let Ok(parsed) = serde_json::from_str::<T>(json_str) {
            return Ok(parsed);
        }
    }

    // Fence removal can break responses with several code blocks
    if let Some(json_str) = find_json_object(trimmed) {
        if let Ok(parsed) = serde_json::from_str::<T>(json_str) {
            return Ok(parsed);
        }
    }

    Err(format!(
        "Failed to extract valid JSON from response. Preview: {}...",
        &trimmed.chars().take(200).collect::<String>()
    ))
}

/// Remove markdown code fences (```json ... ``` or ``` ... ```)
fn remove_markdown_blocks(text: &str) -> String {
    let mut result = text;

    if let Some(rest) = result.strip_prefix("```json") {
        result = rest;
    } else if let Some(rest) = result.strip_prefix("```") {
        result = rest;
    }

    let result = result.trim();
    result.strip_suffix("```").unwrap_or(result).trim().to_string()
}

/// Find the outermost JSON object using brace counting.
///
/// Braces inside string literals are ignored.
fn find_json_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut start_idx: Option<usize> = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if start_idx.is_some() => in_string = true,
            '{' => {
                if depth == 0 {
                    start_idx = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(start) = start_idx {
                        return Some(&text[start..=i]);
                    }
                }
            }
            _ => {}
        }
    }
    None
}
