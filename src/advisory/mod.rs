//! Advisory system boundary
//!
//! The advisory system proposes a reorganization plan. The engine treats it
//! as an opaque function: a request goes out, free-form text comes back, and
//! `plan::PlanInput::from_response` decides what of it is usable.

pub mod client;
pub mod prompts;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::OrganizeError;
use crate::models::{Category, Component, ComponentContent};

pub use client::HttpAdvisor;

/// Category description sent to the advisor
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub key: String,
    pub label: String,
}

/// One component as the advisor sees it
#[derive(Debug, Clone, Serialize)]
pub struct ComponentSummary {
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub sources: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryRequest {
    pub categories: Vec<CategoryInfo>,
    pub components: Vec<ComponentSummary>,
}

impl AdvisoryRequest {
    /// Build a request from scanned components and their (budgeted) content
    pub fn new(components: &[(Component, ComponentContent)]) -> Self {
        let categories = Category::BUILTIN
            .iter()
            .map(|c| CategoryInfo {
                key: c.key().to_string(),
                label: c.label().to_string(),
            })
            .collect();

        let components = components
            .iter()
            .map(|(component, content)| ComponentSummary {
                name: component.name.clone(),
                path: component.path_key(),
                documentation: content.documentation.clone(),
                sources: content.sources.clone(),
            })
            .collect();

        Self {
            categories,
            components,
        }
    }
}

/// Source of advisory plans. Called at most once per run.
#[async_trait]
pub trait AdvisoryProvider: Send + Sync {
    /// Return the advisor's raw response text
    async fn propose(&self, request: &AdvisoryRequest) -> Result<String, OrganizeError>;
}
