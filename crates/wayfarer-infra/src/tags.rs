//! Cost and ownership tags attached to every taggable resource

use crate::config::PROJECT;
use crate::environment::EnvironmentConfig;
use serde::Serialize;
use std::collections::BTreeMap;
use wayfarer_graph::{Input, Properties};

pub const MANAGED_BY: &str = "wayfarer-infra";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn for_environment(environment: &str, settings: &EnvironmentConfig) -> Self {
        let mut tags = BTreeMap::new();
        tags.insert("Environment".to_string(), environment.to_string());
        tags.insert("Project".to_string(), PROJECT.to_string());
        tags.insert("ManagedBy".to_string(), MANAGED_BY.to_string());
        tags.insert("CostCenter".to_string(), settings.cost_center().to_string());
        Self(tags)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&Tags> for Input {
    fn from(tags: &Tags) -> Self {
        let props = tags
            .0
            .iter()
            .fold(Properties::new(), |props, (k, v)| props.set(k.clone(), v.clone()));
        Input::Object(props)
    }
}
