//! Tool catalog — materializes the remote tool schema into a UI-agnostic model.
//!
//! The catalog is rebuilt wholesale on every successful connect and cleared on
//! disconnect; it is never mutated incrementally. Parameter order follows the
//! schema's property order (significant: it drives display/input order
//! downstream), which is why serde_json's `preserve_order` feature is on.

use serde::{Deserialize, Serialize};

use crate::client::RawTool;

/// A single tool parameter derived from the schema's property map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    /// Free-text declared type ("string", "integer", ...), absent when the
    /// schema omits it.
    pub declared_type: Option<String>,
    pub description: Option<String>,
    pub required: bool,
}

/// A tool exposed by the connected server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Vec<ParameterSpec>,
    /// The schema's `required` list, verbatim. Kept separately from the
    /// per-parameter flags: it carries the list's own order and may name
    /// fields with no matching property.
    pub required: Vec<String>,
}

impl ToolSpec {
    /// Names of required parameters, in the required-list's own order.
    pub fn required_names(&self) -> &[String] {
        &self.required
    }
}

/// Ordered collection of tool specs for one connection.
#[derive(Debug, Default)]
pub struct ToolCatalog {
    tools: Vec<ToolSpec>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Build a catalog from the raw descriptors returned by `tools/list`.
    ///
    /// Every schema property becomes a `ParameterSpec`; `required` is set by
    /// membership in the schema's `required` list, never by default. Unknown
    /// or missing description/type fields degrade to `None`, not an error.
    pub fn from_remote_schema(raw_tools: &[RawTool]) -> Self {
        let tools = raw_tools
            .iter()
            .map(|raw| {
                let required: Vec<String> = raw
                    .input_schema
                    .get("required")
                    .and_then(|r| r.as_array())
                    .map(|arr| {
                        arr.iter()
                            .filter_map(|v| v.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default();

                let parameters = raw
                    .input_schema
                    .get("properties")
                    .and_then(|p| p.as_object())
                    .map(|props| {
                        props
                            .iter()
                            .map(|(name, prop)| ParameterSpec {
                                name: name.clone(),
                                declared_type: prop
                                    .get("type")
                                    .and_then(|t| t.as_str())
                                    .map(str::to_string),
                                description: prop
                                    .get("description")
                                    .and_then(|d| d.as_str())
                                    .map(str::to_string),
                                required: required.contains(name),
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                ToolSpec {
                    name: raw.name.clone(),
                    description: raw.description.clone(),
                    parameters,
                    required,
                }
            })
            .collect();

        Self { tools }
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// All tools, in the order the server listed them.
    pub fn tools(&self) -> &[ToolSpec] {
        &self.tools
    }

    /// Tool names, in listing order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn clear(&mut self) {
        self.tools.clear();
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
