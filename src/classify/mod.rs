//! Classifier
//!
//! Deterministic scoring of a component against every built-in category.
//! Pure: the same name and content always yield the same category, which is
//! what keeps repeated runs from producing new moves.

pub mod rules;

use serde::Serialize;

use crate::models::{Category, Component, ComponentContent};
pub use rules::{
    builtin_rules, CategoryRules, DOC_KEYWORD_WEIGHT, NAME_PATTERN_WEIGHT, SCORE_FLOOR,
    SOURCE_KEYWORD_WEIGHT,
};

/// Per-category totals for one component, in precedence order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationScore {
    pub scores: Vec<(Category, u32)>,
}

impl ClassificationScore {
    /// Highest-scoring category; earlier precedence wins ties
    pub fn best(&self) -> Option<(&Category, u32)> {
        let mut best: Option<(&Category, u32)> = None;
        for (category, score) in &self.scores {
            match best {
                Some((_, top)) if *score <= top => {}
                _ => best = Some((category, *score)),
            }
        }
        best
    }

    pub fn get(&self, category: &Category) -> u32 {
        self.scores
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, s)| *s)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<CategoryRules>,
    floor: u32,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            rules: builtin_rules(),
            floor: SCORE_FLOOR,
        }
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score every category for a component
    pub fn score(&self, component: &Component, content: &ComponentContent) -> ClassificationScore {
        let name = component.name.to_lowercase();
        let sources = content.concatenated_sources().to_lowercase();
        let docs = content
            .documentation
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();

        let scores = self
            .rules
            .iter()
            .map(|rules| {
                let mut score = 0;
                for pattern in rules.patterns {
                    if name.contains(pattern) {
                        score += NAME_PATTERN_WEIGHT;
                    }
                }
                for keyword in rules.keywords {
                    if sources.contains(keyword) {
                        score += SOURCE_KEYWORD_WEIGHT;
                    }
                    if docs.contains(keyword) {
                        score += DOC_KEYWORD_WEIGHT;
                    }
                }
                (rules.category.clone(), score)
            })
            .collect();

        ClassificationScore { scores }
    }

    /// Assign a category to a component
    pub fn classify(&self, component: &Component, content: &ComponentContent) -> Category {
        let scores = self.score(component, content);
        let category = match scores.best() {
            Some((category, score)) if score > self.floor => category.clone(),
            _ => Category::DEFAULT,
        };

        tracing::debug!(component = %component.name, category = %category, "Classified component");
        category
    }
}
