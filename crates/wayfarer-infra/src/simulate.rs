//! Local simulated Azure engine
//!
//! Reports the attributes the stack reads back (`id`, storage web endpoint,
//! Front Door host name, domain validation token) without calling Azure.
//! Values are derived from a hash of the subscription and resource urn, so
//! repeated runs produce the same outputs.

use crate::kinds::{AFD_CUSTOM_DOMAIN, AFD_ENDPOINT, LIST_STORAGE_ACCOUNT_KEYS, STORAGE_ACCOUNT};
use parking_lot::Mutex;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use wayfarer_graph::{EngineError, ProvisioningEngine, ResolvedResource, ResourceKind};

pub const DEFAULT_SUBSCRIPTION: &str = "00000000-0000-0000-0000-000000000000";

/// In-process engine for `wayfarer up` and tests
pub struct LocalEngine {
    subscription: String,
    known_kinds: HashSet<&'static str>,
    fail_on: Option<String>,
    created: Mutex<Vec<String>>,
}

impl LocalEngine {
    pub fn new() -> Self {
        Self::with_subscription(DEFAULT_SUBSCRIPTION)
    }

    pub fn with_subscription(subscription: impl Into<String>) -> Self {
        Self {
            subscription: subscription.into(),
            known_kinds: crate::kinds::ALL.iter().map(ResourceKind::as_str).collect(),
            fail_on: None,
            created: Mutex::new(Vec::new()),
        }
    }

    /// Fail creation of the resource with this logical name
    #[must_use]
    pub fn failing_on(mut self, name: impl Into<String>) -> Self {
        self.fail_on = Some(name.into());
        self
    }

    /// Urns in creation order
    pub fn created(&self) -> Vec<String> {
        self.created.lock().clone()
    }

    fn digest(&self, seed: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.subscription.as_bytes());
        hasher.update(b"/");
        hasher.update(seed.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn resource_id(&self, resource: &ResolvedResource) -> String {
        format!(
            "/subscriptions/{}/providers/{}/{}",
            self.subscription,
            resource.kind.short_name(),
            resource.name
        )
    }
}

impl Default for LocalEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ProvisioningEngine for LocalEngine {
    async fn create(&self, resource: &ResolvedResource) -> Result<Value, EngineError> {
        let urn = resource.urn();
        if !self.known_kinds.contains(resource.kind.as_str()) {
            return Err(EngineError::UnsupportedKind(resource.kind.to_string()));
        }
        if self.fail_on.as_deref() == Some(resource.name.as_str()) {
            return Err(EngineError::CreateFailed {
                urn,
                reason: "simulated failure".to_string(),
            });
        }

        let digest = self.digest(&urn);
        let mut attributes = json!({ "id": self.resource_id(resource) });

        if resource.kind == STORAGE_ACCOUNT {
            let account = resource.input_str("accountName").unwrap_or(&resource.name);
            attributes["primaryEndpoints"] = json!({
                "web": format!("https://{account}.z13.web.core.windows.net/"),
                "blob": format!("https://{account}.blob.core.windows.net/"),
            });
        } else if resource.kind == AFD_ENDPOINT {
            let endpoint = resource.input_str("endpointName").unwrap_or(&resource.name);
            attributes["hostName"] = json!(format!("{endpoint}-{}.z01.azurefd.net", &digest[..12]));
        } else if resource.kind == AFD_CUSTOM_DOMAIN {
            attributes["validationProperties"] = json!({ "validationToken": &digest[..32] });
        }

        tracing::debug!(urn = %urn, "simulated create");
        self.created.lock().push(urn);
        Ok(attributes)
    }

    async fn invoke(&self, function: &str, args: Value) -> Result<Value, EngineError> {
        if function != LIST_STORAGE_ACCOUNT_KEYS {
            return Err(EngineError::InvokeFailed {
                function: function.to_string(),
                reason: "unknown function".to_string(),
            });
        }

        let account = args["accountName"].as_str().ok_or_else(|| EngineError::InvokeFailed {
            function: function.to_string(),
            reason: "accountName is required".to_string(),
        })?;
        let keys = ["key1", "key2"]
            .iter()
            .map(|key_name| {
                json!({
                    "keyName": key_name,
                    "permissions": "FULL",
                    "value": self.digest(&format!("{account}/{key_name}")),
                })
            })
            .collect::<Vec<_>>();

        Ok(json!({ "keys": keys }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::RULE;
    use wayfarer_graph::{GraphBuilder, ResourceSpec};

    fn resolved(kind: ResourceKind, name: &str, inputs: Value) -> ResolvedResource {
        let mut graph = GraphBuilder::new();
        let resource = graph.register(ResourceSpec::new(kind, name)).unwrap();
        ResolvedResource {
            id: resource.id(),
            kind,
            name: name.to_string(),
            inputs,
        }
    }

    #[tokio::test]
    async fn test_storage_reports_web_endpoint() {
        let engine = LocalEngine::new();
        let account = resolved(
            STORAGE_ACCOUNT,
            "wayfarerwebdev",
            json!({"accountName": "wayfarerwebdev"}),
        );

        let attributes = engine.create(&account).await.unwrap();
        assert_eq!(
            attributes["primaryEndpoints"]["web"],
            "https://wayfarerwebdev.z13.web.core.windows.net/"
        );
        assert_eq!(engine.created(), vec![account.urn()]);
    }

    #[tokio::test]
    async fn test_host_names_are_deterministic() {
        let endpoint = resolved(
            AFD_ENDPOINT,
            "wayfarer-endpoint-dev",
            json!({"endpointName": "wayfarer-endpoint-dev"}),
        );

        let first = LocalEngine::new().create(&endpoint).await.unwrap();
        let second = LocalEngine::new().create(&endpoint).await.unwrap();
        let other = LocalEngine::with_subscription("other").create(&endpoint).await.unwrap();

        assert_eq!(first["hostName"], second["hostName"]);
        assert_ne!(first["hostName"], other["hostName"]);
        assert!(first["hostName"].as_str().unwrap().ends_with(".z01.azurefd.net"));
    }

    #[tokio::test]
    async fn test_failure_and_unknown_kinds() {
        let engine = LocalEngine::new().failing_on("BlockUnlistedIps");
        let rule = resolved(RULE, "BlockUnlistedIps", json!({}));
        assert!(matches!(engine.create(&rule).await, Err(EngineError::CreateFailed { .. })));

        let unknown = resolved(ResourceKind::new("aws:s3:Bucket"), "b", json!({}));
        assert!(matches!(engine.create(&unknown).await, Err(EngineError::UnsupportedKind(_))));
        assert!(engine.created().is_empty());
    }

    #[tokio::test]
    async fn test_list_keys() {
        let engine = LocalEngine::new();
        let result = engine
            .invoke(LIST_STORAGE_ACCOUNT_KEYS, json!({"accountName": "wayfarerwebdev"}))
            .await
            .unwrap();
        assert_eq!(result["keys"].as_array().map(Vec::len), Some(2));

        assert!(engine.invoke("azure-native:storage:listKeys", json!({})).await.is_err());
        assert!(engine.invoke(LIST_STORAGE_ACCOUNT_KEYS, json!({})).await.is_err());
    }
}
