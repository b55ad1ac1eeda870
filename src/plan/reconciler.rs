//! Plan Reconciler
//!
//! Merges classifier output with an optional validated advisory plan into an
//! ordered list of move operations and the target table of contents.
//!
//! Resolution order for a component's category: plan `tocSections`, then the
//! category directory of a plan move's destination, then the classifier.
//! Only scanned components are ever referenced; plan entries naming anything
//! else are dropped as unknown.

use std::collections::HashMap;
use std::path::Path;

use super::advisory_plan::{PlanInput, PlannedMove};
use crate::error::OrganizeError;
use crate::models::{
    is_within, path_key, Category, Component, MoveOperation, TableOfContents, TocEntry,
};
use crate::security::PathValidator;

/// A scanned component with its classifier-assigned category
#[derive(Debug, Clone)]
pub struct ClassifiedComponent {
    pub component: Component,
    pub category: Category,
}

/// Output of reconciliation
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Moves in execution order
    pub moves: Vec<MoveOperation>,
    /// Target layout; covers every scanned component exactly once
    pub toc: TableOfContents,
    /// Plan notes that survived validation
    pub notes: Vec<String>,
    /// Dropped plan fragments and unknown references
    pub warnings: Vec<String>,
}

/// Per-component decision before moves are emitted
struct Decision {
    category: Category,
    plan_move: Option<PlannedMove>,
    /// The plan wants the component left where it is
    pinned: bool,
}

pub struct PlanReconciler<'a> {
    classified: &'a [ClassifiedComponent],
    by_path: HashMap<String, usize>,
    by_name: HashMap<&'a str, Vec<usize>>,
}

impl<'a> PlanReconciler<'a> {
    pub fn new(classified: &'a [ClassifiedComponent]) -> Self {
        let mut by_path = HashMap::new();
        let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();

        for (idx, item) in classified.iter().enumerate() {
            by_path.insert(item.component.path_key(), idx);
            by_name.entry(item.component.name.as_str()).or_default().push(idx);
        }

        Self {
            classified,
            by_path,
            by_name,
        }
    }

    /// Build moves and the target table of contents
    pub fn reconcile(&self, plan: &PlanInput) -> Reconciliation {
        let mut warnings: Vec<String> = plan.problems().to_vec();
        let mut decisions: Vec<Decision> = self
            .classified
            .iter()
            .map(|item| Decision {
                category: item.category.clone(),
                plan_move: None,
                pinned: false,
            })
            .collect();

        let mut notes = Vec::new();
        let mut plan_move_order: Vec<usize> = Vec::new();

        if let Some(validated) = plan.plan() {
            notes = validated.notes.clone();

            let mut from_sections = vec![false; decisions.len()];
            for (category, names) in &validated.toc_sections {
                for name in names {
                    let Some(indices) = self.by_name.get(name.as_str()) else {
                        warnings.push(unknown(name));
                        continue;
                    };
                    for &idx in indices {
                        if from_sections[idx] {
                            warnings.push(format!(
                                "component `{}` listed in more than one plan section; keeping the first",
                                name
                            ));
                            continue;
                        }
                        from_sections[idx] = true;
                        decisions[idx].category = category.clone();
                    }
                }
            }

            for planned in &validated.moves {
                let Some(idx) = self.lookup(&planned.from) else {
                    warnings.push(unknown(&planned.from));
                    continue;
                };
                if decisions[idx].plan_move.is_some() || decisions[idx].pinned {
                    warnings.push(format!(
                        "duplicate plan move for `{}` dropped",
                        planned.from
                    ));
                    continue;
                }

                let current = self.classified[idx].component.path_key();
                if !from_sections[idx] {
                    if let Some(category) = destination_category(&planned.to) {
                        decisions[idx].category = category;
                    }
                }

                if normalize_key(&planned.to) == current {
                    // Already where the plan wants it
                    decisions[idx].pinned = true;
                    continue;
                }
                decisions[idx].plan_move = Some(planned.clone());
                plan_move_order.push(idx);
            }
        }

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        // A component stays put only if nothing above it moves; otherwise it
        // would be carried along to a path nobody planned.
        let mut by_depth: Vec<usize> = (0..decisions.len()).collect();
        by_depth.sort_by_key(|&idx| self.classified[idx].component.depth());
        let mut moving = vec![false; decisions.len()];
        for &idx in &by_depth {
            let component = &self.classified[idx].component;
            let decision = &decisions[idx];
            let in_place = decision.pinned
                || component.current_category_dir().as_deref() == Some(decision.category.key());
            let ancestor_moving = self.ancestors(idx).iter().any(|&a| moving[a]);
            moving[idx] = decision.plan_move.is_some() || !in_place || ancestor_moving;
        }

        let mut toc = TableOfContents::new();
        let mut plan_moves: Vec<MoveOperation> = Vec::new();
        let mut derived: Vec<(usize, MoveOperation)> = Vec::new();

        for (idx, (item, decision)) in self.classified.iter().zip(&decisions).enumerate() {
            let component = &item.component;
            let current = component.path_key();

            let target_path = match &decision.plan_move {
                Some(planned) => planned.to.trim().to_string(),
                None if !moving[idx] => current.clone(),
                None => {
                    let to = format!("{}/{}", decision.category.key(), component.name);
                    let from_category = component.current_category_dir();
                    let reason = if from_category.as_deref() == Some(decision.category.key()) {
                        format!("Moving out of {} before its parent is relocated", current)
                    } else {
                        format!(
                            "Moving from {} to {} category",
                            from_category.as_deref().unwrap_or("root"),
                            decision.category.key()
                        )
                    };
                    if decision.pinned {
                        let warning = format!(
                            "component `{}` cannot stay in place while its parent moves",
                            current
                        );
                        tracing::warn!("{}", warning);
                        warnings.push(warning);
                    }
                    derived.push((idx, MoveOperation::new(current.clone(), to.clone(), Some(reason))));
                    to
                }
            };

            toc.insert(
                decision.category.clone(),
                TocEntry {
                    name: component.name.clone(),
                    path: target_path,
                    origin: current,
                },
            );
        }

        for idx in plan_move_order {
            if let Some(planned) = &decisions[idx].plan_move {
                let reason = planned
                    .reason
                    .clone()
                    .or_else(|| Some("Advisory plan".to_string()));
                plan_moves.push(MoveOperation::new(
                    self.classified[idx].component.path_key(),
                    planned.to.trim(),
                    reason,
                ));
            }
        }

        // Deepest first, so moving an outer component never strands a nested one
        derived.sort_by(|(a, _), (b, _)| {
            let depth_a = self.classified[*a].component.depth();
            let depth_b = self.classified[*b].component.depth();
            depth_b.cmp(&depth_a).then(a.cmp(b))
        });

        let mut moves = plan_moves;
        moves.extend(derived.into_iter().map(|(_, op)| op));
        let moves = nested_first(moves);

        tracing::info!(
            components = self.classified.len(),
            moves = moves.len(),
            warnings = warnings.len(),
            "Reconciled organization plan"
        );

        Reconciliation {
            moves,
            toc,
            notes,
            warnings,
        }
    }

    /// Table of contents for the layout as it stands, without moves.
    ///
    /// Components under a category directory are listed in that category;
    /// components directly under the root fall back to their classification.
    pub fn current_layout(&self) -> TableOfContents {
        let mut toc = TableOfContents::new();
        for item in self.classified {
            let component = &item.component;
            let category = component
                .current_category_dir()
                .map(|dir| Category::from_key(&dir))
                .unwrap_or_else(|| item.category.clone());
            let path = component.path_key();
            toc.insert(
                category,
                TocEntry {
                    name: component.name.clone(),
                    path: path.clone(),
                    origin: path,
                },
            );
        }
        toc
    }

    /// Scanned components that contain the component at `idx`
    fn ancestors(&self, idx: usize) -> Vec<usize> {
        self.classified[idx]
            .component
            .current_path
            .ancestors()
            .skip(1)
            .filter(|p| !p.as_os_str().is_empty())
            .filter_map(|p| self.by_path.get(&path_key(p)).copied())
            .collect()
    }

    /// Find a scanned component by relative path, or by name when unambiguous
    fn lookup(&self, reference: &str) -> Option<usize> {
        let key = normalize_key(reference);
        if let Some(&idx) = self.by_path.get(&key) {
            return Some(idx);
        }
        match self.by_name.get(key.as_str()) {
            Some(indices) if indices.len() == 1 => Some(indices[0]),
            _ => None,
        }
    }
}

/// Reorder so every move of a nested component runs before the move of any
/// component containing it. Otherwise the order is kept.
fn nested_first(moves: Vec<MoveOperation>) -> Vec<MoveOperation> {
    let depth = |op: &MoveOperation| op.from.matches('/').count();
    let mut emitted = vec![false; moves.len()];
    let mut order = Vec::with_capacity(moves.len());

    for idx in 0..moves.len() {
        if emitted[idx] {
            continue;
        }
        let mut nested: Vec<usize> = (0..moves.len())
            .filter(|&j| !emitted[j] && is_within(&moves[j].from, &moves[idx].from))
            .collect();
        nested.sort_by(|&a, &b| depth(&moves[b]).cmp(&depth(&moves[a])));
        for j in nested {
            emitted[j] = true;
            order.push(j);
        }
        emitted[idx] = true;
        order.push(idx);
    }

    let mut slots: Vec<Option<MoveOperation>> = moves.into_iter().map(Some).collect();
    order.into_iter().filter_map(|idx| slots[idx].take()).collect()
}

fn unknown(name: &str) -> String {
    OrganizeError::UnknownComponent(name.to_string()).to_string()
}

/// Lexically normalized forward-slash key for a plan path
fn normalize_key(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    PathValidator::normalize_path(Path::new(trimmed))
        .map(|p| path_key(&p))
        .unwrap_or_else(|_| trimmed.to_string())
}

/// Category implied by a plan destination such as `feedback/Button`
fn destination_category(to: &str) -> Option<Category> {
    let key = normalize_key(to);
    let mut segments = key.split('/');
    let first = segments.next()?;
    segments.next()?;
    let category = Category::from_key(first);
    if category.is_builtin() || PathValidator::is_safe_segment(first) {
        Some(category)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MoveStatus;
    use crate::plan::advisory_plan::ValidatedPlan;
    use serde_json::json;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn item(path: &str, category: Category) -> ClassifiedComponent {
        let current_path = PathBuf::from(path);
        ClassifiedComponent {
            component: Component {
                name: current_path.file_name().unwrap().to_string_lossy().to_string(),
                current_path,
                has_documentation: true,
                source_file_names: BTreeSet::new(),
            },
            category,
        }
    }

    fn assert_covers_each_once(classified: &[ClassifiedComponent], toc: &TableOfContents) {
        assert_eq!(toc.len(), classified.len());
        for item in classified {
            let listed = toc
                .sections()
                .flat_map(|(_, entries)| entries.iter())
                .filter(|e| e.origin == item.component.path_key())
                .count();
            assert_eq!(listed, 1, "{} listed {} times", item.component.path_key(), listed);
        }
    }

    #[test]
    fn test_classifier_only() {
        let classified = vec![
            item("Button", Category::Feedback),
            item("DataTable", Category::DataDisplay),
            item("UI/Input", Category::Ui),
        ];
        let result = PlanReconciler::new(&classified).reconcile(&PlanInput::None);

        let moves: Vec<(&str, &str)> = result
            .moves
            .iter()
            .map(|m| (m.from.as_str(), m.to.as_str()))
            .collect();
        assert_eq!(
            moves,
            vec![
                ("Button", "feedback/Button"),
                ("DataTable", "data-display/DataTable"),
            ]
        );
        assert!(result.moves.iter().all(|m| m.status == MoveStatus::Pending));
        assert_eq!(
            result.moves[0].reason.as_deref(),
            Some("Moving from root to feedback category")
        );

        assert_eq!(result.toc.names(&Category::Feedback), vec!["Button"]);
        assert_eq!(result.toc.names(&Category::DataDisplay), vec!["DataTable"]);
        assert_eq!(result.toc.names(&Category::Ui), vec!["Input"]);
        assert_covers_each_once(&classified, &result.toc);
    }

    #[test]
    fn test_already_organized_yields_no_moves() {
        let classified = vec![
            item("feedback/Button", Category::Feedback),
            item("data-display/Card/Header", Category::DataDisplay),
        ];
        let result = PlanReconciler::new(&classified).reconcile(&PlanInput::None);

        assert!(result.moves.is_empty());
        assert_covers_each_once(&classified, &result.toc);
    }

    #[test]
    fn test_nested_moves_deepest_first() {
        let classified = vec![
            item("Card", Category::DataDisplay),
            item("Card/Header", Category::Layout),
        ];
        let result = PlanReconciler::new(&classified).reconcile(&PlanInput::None);

        assert_eq!(result.moves[0].from, "Card/Header");
        assert_eq!(result.moves[0].to, "layout/Header");
        assert_eq!(result.moves[1].from, "Card");
    }

    #[test]
    fn test_child_leaves_before_parent_moves() {
        let classified = vec![
            item("feedback/Card", Category::DataDisplay),
            item("feedback/Card/Spinner", Category::Feedback),
        ];
        let result = PlanReconciler::new(&classified).reconcile(&PlanInput::None);

        let moves: Vec<(&str, &str)> = result
            .moves
            .iter()
            .map(|m| (m.from.as_str(), m.to.as_str()))
            .collect();
        assert_eq!(
            moves,
            vec![
                ("feedback/Card/Spinner", "feedback/Spinner"),
                ("feedback/Card", "data-display/Card"),
            ]
        );
        assert_eq!(
            result.moves[0].reason.as_deref(),
            Some("Moving out of feedback/Card before its parent is relocated")
        );
        assert_covers_each_once(&classified, &result.toc);
    }

    #[test]
    fn test_plan_move_of_parent_runs_after_nested_moves() {
        let classified = vec![
            item("Card", Category::DataDisplay),
            item("Card/Spinner", Category::Feedback),
        ];
        let plan = PlanInput::from_value(&json!({
            "moves": [{"from": "Card", "to": "data-display/Card"}]
        }));

        let result = PlanReconciler::new(&classified).reconcile(&plan);

        assert_eq!(result.moves.len(), 2);
        assert_eq!(result.moves[0].from, "Card/Spinner");
        assert_eq!(result.moves[0].to, "feedback/Spinner");
        assert_eq!(result.moves[1].from, "Card");
        assert_eq!(result.moves[1].to, "data-display/Card");
    }

    #[test]
    fn test_nested_first_keeps_unrelated_order() {
        let moves = vec![
            MoveOperation::new("Card", "data-display/Card", None),
            MoveOperation::new("Button", "feedback/Button", None),
            MoveOperation::new("Card/Header", "layout/Header", None),
            MoveOperation::new("Card/Header/Icon", "UI/Icon", None),
            MoveOperation::new("CardList", "data-display/CardList", None),
        ];

        let froms: Vec<String> = nested_first(moves).into_iter().map(|m| m.from).collect();
        assert_eq!(
            froms,
            vec!["Card/Header/Icon", "Card/Header", "Card", "Button", "CardList"]
        );
    }

    #[test]
    fn test_plan_takes_precedence() {
        let classified = vec![
            item("Button", Category::Feedback),
            item("Menu", Category::Navigation),
            item("Slider", Category::Ui),
        ];
        let plan = PlanInput::from_value(&json!({
            "moves": [{"from": "Button", "to": "UI/Button", "reason": "primitive control"}],
            "tocSections": {"charts": ["Slider"]}
        }));

        let result = PlanReconciler::new(&classified).reconcile(&plan);

        assert_eq!(result.moves[0].from, "Button");
        assert_eq!(result.moves[0].to, "UI/Button");
        assert_eq!(result.moves[0].reason.as_deref(), Some("primitive control"));
        // Unmentioned components still follow the classifier
        assert!(result.moves.iter().any(|m| m.from == "Menu" && m.to == "navigation/Menu"));
        assert!(result.moves.iter().any(|m| m.from == "Slider" && m.to == "charts/Slider"));

        assert_eq!(result.toc.names(&Category::Ui), vec!["Button"]);
        assert_eq!(
            result.toc.names(&Category::Extension("charts".into())),
            vec!["Slider"]
        );
        assert!(result.warnings.is_empty());
        assert_covers_each_once(&classified, &result.toc);
    }

    #[test]
    fn test_unknown_components_dropped() {
        let classified = vec![item("Button", Category::Feedback)];
        let plan = PlanInput::Valid(ValidatedPlan {
            moves: vec![PlannedMove {
                from: "Ghost".into(),
                to: "UI/Ghost".into(),
                reason: None,
            }],
            toc_sections: vec![(Category::Layout, vec!["Phantom".into()])],
            notes: vec![],
        });

        let result = PlanReconciler::new(&classified).reconcile(&plan);

        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings.iter().all(|w| w.contains("unknown component")));
        assert_eq!(result.moves.len(), 1);
        assert_eq!(result.moves[0].from, "Button");
        assert_eq!(result.toc.len(), 1);
    }

    #[test]
    fn test_malformed_moves_fall_back_to_classifier() {
        let classified = vec![
            item("Button", Category::Feedback),
            item("DataTable", Category::DataDisplay),
        ];
        let plan = PlanInput::from_value(&json!({"moves": "everything to UI"}));

        let result = PlanReconciler::new(&classified).reconcile(&plan);

        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.moves.len(), 2);
        assert_eq!(result.moves[0].to, "feedback/Button");
        assert_eq!(result.moves[1].to, "data-display/DataTable");
    }

    #[test]
    fn test_untrusted_destination_passed_through() {
        let classified = vec![item("Button", Category::Feedback)];
        let plan = PlanInput::from_value(&json!({
            "moves": [{"from": "Button", "to": "../../etc/passwd"}]
        }));

        let result = PlanReconciler::new(&classified).reconcile(&plan);

        // The mover rejects it; the reconciler only matches known sources
        assert_eq!(result.moves.len(), 1);
        assert_eq!(result.moves[0].to, "../../etc/passwd");
        assert_eq!(result.toc.names(&Category::Feedback), vec!["Button"]);
    }

    #[test]
    fn test_plan_can_pin_component_in_place() {
        let classified = vec![item("Button", Category::Feedback)];
        let plan = PlanInput::from_value(&json!({
            "moves": [{"from": "Button", "to": "Button"}],
            "tocSections": {"UI": ["Button"]}
        }));

        let result = PlanReconciler::new(&classified).reconcile(&plan);

        assert!(result.moves.is_empty());
        assert_eq!(result.toc.names(&Category::Ui), vec!["Button"]);
    }

    #[test]
    fn test_current_layout() {
        let classified = vec![
            item("feedback/Button", Category::Feedback),
            item("charts/Pie", Category::Ui),
            item("Slider", Category::Ui),
        ];
        let toc = PlanReconciler::new(&classified).current_layout();

        assert_eq!(toc.names(&Category::Feedback), vec!["Button"]);
        assert_eq!(toc.names(&Category::Extension("charts".into())), vec!["Pie"]);
        assert_eq!(toc.names(&Category::Ui), vec!["Slider"]);
    }
}
