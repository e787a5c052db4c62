//! Tool catalog and the handler traits tools implement.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;

use crate::content::ContentBackend;
use crate::credentials::CredentialSnapshot;
use crate::search::SearchClient;

use super::protocol::{JsonObject, ToolDescriptor, ToolResult};

/// Collaborators available to a tool invocation.
///
/// Built once per request; `credentials` is the snapshot taken for that request.
#[derive(Clone)]
pub struct ToolContext {
    /// Content store adapter.
    pub content: Arc<dyn ContentBackend>,
    /// Search backend client.
    pub search: Arc<SearchClient>,
    /// Credentials in effect for this request.
    pub credentials: Arc<CredentialSnapshot>,
    /// Site origin recorded in search document metadata.
    pub site_url: String,
}

/// Object-safe capability shared by every catalog entry.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Run the tool against raw arguments.
    async fn call(&self, ctx: &ToolContext, arguments: JsonObject) -> ToolResult;
}

/// A tool split into argument validation and execution.
///
/// `validate` turns raw arguments into a typed input or an `Error: ...` result; `run` only ever
/// sees validated input.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Validated, normalized arguments.
    type Input: Send;

    /// Check and normalize raw arguments.
    fn validate(&self, arguments: &JsonObject) -> Result<Self::Input, ToolResult>;

    /// Execute with validated input.
    async fn run(&self, ctx: &ToolContext, input: Self::Input) -> ToolResult;
}

#[async_trait]
impl<T: Tool> ToolHandler for T {
    async fn call(&self, ctx: &ToolContext, arguments: JsonObject) -> ToolResult {
        match self.validate(&arguments) {
            Ok(input) => self.run(ctx, input).await,
            Err(rejection) => rejection,
        }
    }
}

struct CatalogEntry {
    descriptor: ToolDescriptor,
    handler: Arc<dyn ToolHandler>,
}

/// Ordered registry mapping tool names to descriptors and handlers.
#[derive(Default)]
pub struct ToolCatalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. Registering an existing name replaces it in place.
    pub fn register<H>(&mut self, descriptor: ToolDescriptor, handler: H)
    where
        H: ToolHandler + 'static,
    {
        let entry = CatalogEntry {
            descriptor,
            handler: Arc::new(handler),
        };
        match self.index.get(&entry.descriptor.name) {
            Some(&position) => self.entries[position] = entry,
            None => {
                self.index
                    .insert(entry.descriptor.name.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Descriptors in declaration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.entries.iter().map(|entry| &entry.descriptor)
    }

    /// Handler registered under the exact name.
    pub fn handler(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.index
            .get(name)
            .map(|&position| &self.entries[position].handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    struct Echo(&'static str);

    #[async_trait]
    impl ToolHandler for Echo {
        async fn call(&self, _ctx: &ToolContext, _arguments: JsonObject) -> ToolResult {
            ToolResult::text(self.0)
        }
    }

    fn descriptor(name: &str) -> ToolDescriptor {
        ToolDescriptor {
            name: name.into(),
            description: String::new(),
            input_schema: serde_json::Map::from_iter([("type".to_string(), Value::from("object"))]),
        }
    }

    #[test]
    fn keeps_declaration_order_and_replaces_duplicates() {
        let mut catalog = ToolCatalog::new();
        catalog.register(descriptor("b"), Echo("b"));
        catalog.register(descriptor("a"), Echo("a"));
        catalog.register(descriptor("b"), Echo("b2"));

        let names: Vec<_> = catalog.descriptors().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(catalog.descriptors().count(), 2);
        assert!(catalog.handler("a").is_some());
        assert!(catalog.handler("missing").is_none());
    }
}
