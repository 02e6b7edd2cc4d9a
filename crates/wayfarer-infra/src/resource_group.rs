use crate::kinds::RESOURCE_GROUP;
use crate::tags::Tags;
use wayfarer_graph::{
    GraphBuilder, GraphBuilderError, Output, Properties, ResourceRef, ResourceSpec,
};

/// Root scoping container for every stack resource
#[derive(Debug, Clone)]
pub struct ResourceGroup {
    resource: ResourceRef,
    name: String,
}

impl ResourceGroup {
    pub fn create(
        graph: &mut GraphBuilder,
        name: &str,
        location: &str,
        tags: &Tags,
    ) -> Result<Self, GraphBuilderError> {
        let resource = graph.register(
            ResourceSpec::new(RESOURCE_GROUP, name).with_properties(
                Properties::new()
                    .set("resourceGroupName", name)
                    .set("location", location)
                    .set("tags", tags),
            ),
        )?;
        tracing::info!(resource_group = name, location, "declared resource group");

        Ok(Self {
            resource,
            name: name.to_string(),
        })
    }

    pub fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Group name as a deferred input, so consumers are ordered after the group
    pub fn name_output(&self) -> Output<String> {
        self.resource.output("resourceGroupName")
    }
}
