use super::AdvisoryRequest;

/// System prompt for component organization
pub const ORGANIZE_SYSTEM_PROMPT: &str = r#"You organize a library of UI components into category folders.

RULES:
1. Only reference components listed in the request, by their exact path or name
2. Paths are relative to the components directory; never use absolute paths or ".."
3. Prefer the listed category keys; invent a new key only when none fits
4. A component already inside its category folder needs no move
5. Sort component names inside each section

Respond with ONLY a JSON object:
{
  "moves": [{"from": "Button", "to": "feedback/Button", "reason": "short reason"}],
  "tocSections": {"feedback": ["Button"]},
  "notes": ["short observations"]
}"#;

/// Build the user prompt carrying the component inventory
pub fn build_organize_prompt(request: &AdvisoryRequest) -> Result<String, String> {
    let inventory = serde_json::to_string_pretty(request)
        .map_err(|e| format!("Failed to serialize advisory request: {}", e))?;

    Ok(format!(
        r#"Organize these components.

INVENTORY:
---
{}
---

Respond with the JSON plan only. No explanation."#,
        inventory
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Component, ComponentContent};
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    #[test]
    fn test_prompt_contains_inventory() {
        let component = Component {
            name: "Toast".into(),
            current_path: PathBuf::from("Toast"),
            has_documentation: false,
            source_file_names: BTreeSet::new(),
        };
        let request = AdvisoryRequest::new(&[(component, ComponentContent::default())]);

        let prompt = build_organize_prompt(&request).unwrap();
        assert!(prompt.contains("\"name\": \"Toast\""));
        assert!(prompt.contains("\"key\": \"data-display\""));
    }
}
