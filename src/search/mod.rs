//! Search backend adapter: GraphQL document indexing over HTTP.

mod client;
pub mod types;

pub use client::SearchClient;
pub use types::{IndexableAsset, MutationOutcome, SearchDocument, SearchError};

/// System name recorded in document metadata.
pub const SYSTEM_NAME: &str = "site-mcp";

/// Mutation indexing a single document.
pub const INDEX_MUTATION: &str = "mutation IndexDocument($input: DocumentInput!) { index(input: $input) { code success message } }";

/// Mutation indexing several documents in one request.
pub const BULK_INDEX_MUTATION: &str = "mutation BulkIndexDocuments($input: BulkIndexInput!) { bulkIndex(input: $input) { code success message } }";
