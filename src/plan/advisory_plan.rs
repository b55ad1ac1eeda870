//! Structural validation of advisory plans.
//!
//! The advisory response is untrusted. Nothing downstream reads the raw JSON:
//! every fragment passes through here first and is either kept in a
//! `ValidatedPlan` or dropped with a `PlanValidation` error.

use serde_json::{Map, Value};

use super::json_parser::extract_json;
use crate::error::OrganizeError;
use crate::models::Category;
use crate::security::PathValidator;

/// A move entry that passed shape checks (paths are not yet sandboxed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub from: String,
    pub to: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedPlan {
    pub moves: Vec<PlannedMove>,
    /// Sections in key order; duplicate keys for one category are merged
    pub toc_sections: Vec<(Category, Vec<String>)>,
    pub notes: Vec<String>,
}

/// An advisory plan after validation
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PlanInput {
    /// Classifier-only run
    #[default]
    None,
    Valid(ValidatedPlan),
    /// Some fragments were dropped; `salvaged` holds what survived
    Malformed {
        salvaged: ValidatedPlan,
        problems: Vec<String>,
    },
}

impl PlanInput {
    /// Validate the free-form text returned by the advisory system
    pub fn from_response(text: &str) -> Self {
        match extract_json::<Value>(text) {
            Ok(value) => Self::from_value(&value),
            Err(e) => Self::Malformed {
                salvaged: ValidatedPlan::default(),
                problems: vec![invalid("response", e)],
            },
        }
    }

    /// Validate an already-parsed plan document
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::Malformed {
                salvaged: ValidatedPlan::default(),
                problems: vec![invalid("plan", "expected a JSON object")],
            };
        };

        let mut plan = ValidatedPlan::default();
        let mut problems = Vec::new();

        if let Some(moves) = object.get("moves") {
            plan.moves = validate_moves(moves, &mut problems);
        }

        let sections = object
            .get("tocSections")
            .map(|v| ("tocSections", v))
            .or_else(|| object.get("toc_sections").map(|v| ("toc_sections", v)));
        if let Some((key, sections)) = sections {
            plan.toc_sections = validate_sections(key, sections, &mut problems);
        }

        if let Some(notes) = object.get("notes") {
            plan.notes = validate_notes(notes, &mut problems);
        }

        for problem in &problems {
            tracing::warn!("Dropped advisory plan fragment: {}", problem);
        }

        if problems.is_empty() {
            Self::Valid(plan)
        } else {
            Self::Malformed {
                salvaged: plan,
                problems,
            }
        }
    }

    /// The usable part of the plan, if any
    pub fn plan(&self) -> Option<&ValidatedPlan> {
        match self {
            Self::None => None,
            Self::Valid(plan) => Some(plan),
            Self::Malformed { salvaged, .. } => Some(salvaged),
        }
    }

    pub fn problems(&self) -> &[String] {
        match self {
            Self::Malformed { problems, .. } => problems,
            _ => &[],
        }
    }
}

fn invalid(fragment: impl Into<String>, message: impl Into<String>) -> String {
    OrganizeError::PlanValidation {
        fragment: fragment.into(),
        message: message.into(),
    }
    .to_string()
}

fn validate_moves(value: &Value, problems: &mut Vec<String>) -> Vec<PlannedMove> {
    let Some(entries) = value.as_array() else {
        problems.push(invalid("moves", format!("expected an array, got {}", kind(value))));
        return Vec::new();
    };

    let mut moves = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let fragment = format!("moves[{}]", idx);
        let Some(object) = entry.as_object() else {
            problems.push(invalid(fragment, format!("expected an object, got {}", kind(entry))));
            continue;
        };

        let from = required_string(object, "from");
        let to = required_string(object, "to");
        match (from, to) {
            (Some(from), Some(to)) => moves.push(PlannedMove {
                from,
                to,
                reason: object
                    .get("reason")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
            _ => problems.push(invalid(fragment, "`from` and `to` must be non-empty strings")),
        }
    }

    moves
}

fn required_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn validate_sections(
    key: &str,
    value: &Value,
    problems: &mut Vec<String>,
) -> Vec<(Category, Vec<String>)> {
    let Some(object) = value.as_object() else {
        problems.push(invalid(key, format!("expected an object, got {}", kind(value))));
        return Vec::new();
    };

    let mut sections: Vec<(Category, Vec<String>)> = Vec::new();
    for (section_key, names) in object {
        let fragment = format!("{}.{}", key, section_key);
        let category = Category::from_key(section_key);

        if !category.is_builtin() && !PathValidator::is_safe_segment(category.key()) {
            problems.push(invalid(fragment, "category key is not a safe directory name"));
            continue;
        }

        let Some(list) = names.as_array() else {
            problems.push(invalid(fragment, format!("expected an array, got {}", kind(names))));
            continue;
        };

        let mut valid_names = Vec::with_capacity(list.len());
        for (idx, name) in list.iter().enumerate() {
            match name.as_str().map(str::trim).filter(|s| !s.is_empty()) {
                Some(name) => valid_names.push(name.to_string()),
                None => problems.push(invalid(
                    format!("{}[{}]", fragment, idx),
                    "expected a component name",
                )),
            }
        }

        match sections.iter_mut().find(|(c, _)| *c == category) {
            Some((_, existing)) => existing.extend(valid_names),
            None => sections.push((category, valid_names)),
        }
    }

    sections
}

fn validate_notes(value: &Value, problems: &mut Vec<String>) -> Vec<String> {
    match value {
        Value::String(note) => vec![note.clone()],
        Value::Array(items) => {
            let mut notes = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                match item.as_str() {
                    Some(note) => notes.push(note.to_string()),
                    None => problems.push(invalid(format!("notes[{}]", idx), "expected a string")),
                }
            }
            notes
        }
        other => {
            problems.push(invalid("notes", format!("expected an array, got {}", kind(other))));
            Vec::new()
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_plan() {
        let value = json!({
            "moves": [{"from": "Button", "to": "feedback/Button", "reason": "it is a button"}],
            "tocSections": {"feedback": ["Button"], "charts": ["Pie"]},
            "notes": ["looks good"]
        });

        let input = PlanInput::from_value(&value);
        let PlanInput::Valid(plan) = input else {
            panic!("expected valid plan");
        };

        assert_eq!(plan.moves.len(), 1);
        assert_eq!(plan.moves[0].reason.as_deref(), Some("it is a button"));
        assert_eq!(plan.toc_sections.len(), 2);
        assert!(plan
            .toc_sections
            .iter()
            .any(|(c, names)| *c == Category::Extension("charts".into()) && names == &["Pie"]));
        assert_eq!(plan.notes, vec!["looks good".to_string()]);
    }

    #[test]
    fn test_moves_as_string_is_dropped() {
        let value = json!({"moves": "move everything", "notes": ["hi"]});

        let input = PlanInput::from_value(&value);
        match &input {
            PlanInput::Malformed { salvaged, problems } => {
                assert!(salvaged.moves.is_empty());
                assert_eq!(salvaged.notes, vec!["hi".to_string()]);
                assert_eq!(problems.len(), 1);
                assert!(problems[0].contains("moves"));
            }
            other => panic!("expected malformed plan, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_entries_dropped_individually() {
        let value = json!({
            "moves": [
                {"from": "Button", "to": "feedback/Button"},
                {"from": "Modal"},
                "Toast -> feedback",
                {"from": "", "to": "UI/x"}
            ],
            "tocSections": {"UI": ["Input", 3], "layout": "Grid", "../etc": ["x"]}
        });

        let input = PlanInput::from_value(&value);
        let plan = input.plan().unwrap();

        assert_eq!(plan.moves.len(), 1);
        assert_eq!(plan.toc_sections, vec![(Category::Ui, vec!["Input".to_string()])]);
        assert_eq!(input.problems().len(), 6);
    }

    #[test]
    fn test_non_object_plan() {
        let input = PlanInput::from_value(&json!(["Button"]));
        assert!(matches!(input, PlanInput::Malformed { .. }));
        assert_eq!(input.plan(), Some(&ValidatedPlan::default()));
    }

    #[test]
    fn test_from_response_with_prose() {
        let input = PlanInput::from_response(
            "Sure! ```json\n{\"toc_sections\": {\"navigation\": [\"Menu\"]}}\n```",
        );
        let PlanInput::Valid(plan) = input else {
            panic!("expected valid plan");
        };
        assert_eq!(plan.toc_sections[0].0, Category::Navigation);
    }

    #[test]
    fn test_unparseable_response() {
        let input = PlanInput::from_response("no plan today");
        assert!(matches!(input, PlanInput::Malformed { .. }));
        assert_eq!(input.problems().len(), 1);
    }
}
