//! Tool definitions advertised to clients.

use super::ToolName;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Name, description and input schema of one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    name: String,
    description: String,
    input_schema: Value,
}

impl ToolDefinition {
    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the JSON schema of the tool's parameters.
    #[must_use]
    pub const fn input_schema(&self) -> &Value {
        &self.input_schema
    }
}

fn region_property() -> Value {
    json!({
        "type": "string",
        "description": "Region code such as us-ashburn-1. Defaults to the configured region."
    })
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

impl From<ToolName> for ToolDefinition {
    fn from(tool: ToolName) -> Self {
        let (description, input_schema) = match tool {
            ToolName::ListCompartments => (
                "List the tenancy root and all active compartments beneath it",
                object_schema(json!({}), &[]),
            ),
            ToolName::GetCompartmentByName => (
                "Get a compartment by its exact name",
                object_schema(
                    json!({ "compartment_name": { "type": "string" } }),
                    &["compartment_name"],
                ),
            ),
            ToolName::ListComputeInstances => (
                "List all compute instances in a compartment",
                object_schema(
                    json!({
                        "compartment_name": { "type": "string" },
                        "region": region_property()
                    }),
                    &["compartment_name"],
                ),
            ),
            ToolName::GetComputeInstance => (
                "Get detailed information about a compute instance by id",
                object_schema(
                    json!({
                        "instance_id": { "type": "string" },
                        "region": region_property()
                    }),
                    &["instance_id"],
                ),
            ),
            ToolName::GetComputeInstanceByName => (
                "Get a compute instance by display name within a compartment",
                object_schema(
                    json!({
                        "instance_name": { "type": "string" },
                        "compartment_name": { "type": "string" },
                        "region": region_property()
                    }),
                    &["instance_name", "compartment_name"],
                ),
            ),
            ToolName::ComputeInstanceAction => (
                "Perform a lifecycle action on a compute instance",
                object_schema(
                    json!({
                        "instance_id": { "type": "string" },
                        "action": {
                            "type": "string",
                            "enum": ["START", "STOP", "RESTART", "RESET"]
                        },
                        "region": region_property()
                    }),
                    &["instance_id", "action"],
                ),
            ),
        };

        Self {
            name: tool.as_str().to_owned(),
            description: description.to_owned(),
            input_schema,
        }
    }
}

/// Returns the definitions of every tool in registration order.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolName::ALL.into_iter().map(ToolDefinition::from).collect()
}
