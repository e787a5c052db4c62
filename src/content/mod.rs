//! Content backend adapter: posts, their metadata, and site information.
//!
//! Tool handlers only talk to [`ContentBackend`]. The crate ships [`MemoryContentStore`], an
//! in-process implementation; a deployment fronting a real CMS implements the trait against it.

mod memory;
pub mod sanitize;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

pub use memory::MemoryContentStore;

/// Metadata key holding the Cloudinary public id attached to a post.
pub const META_CLOUDINARY_PUBLIC_ID: &str = "_cloudinary_public_id";
/// Metadata key holding the Cloudinary delivery URL attached to a post.
pub const META_CLOUDINARY_URL: &str = "_cloudinary_url";

/// Errors surfaced by content backends.
#[derive(Debug, Error)]
pub enum ContentError {
    /// No post exists with the requested id.
    #[error("Post {0} not found")]
    NotFound(u64),
    /// Backend failed for any other reason.
    #[error("Content backend failure: {0}")]
    Backend(String),
}

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostStatus {
    /// Publicly visible.
    Publish,
    /// Work in progress.
    Draft,
    /// Awaiting review.
    Pending,
    /// Visible to editors only.
    Private,
    /// Scheduled for later publication.
    Future,
}

impl PostStatus {
    /// Wire label of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Private => "private",
            Self::Future => "future",
        }
    }

    /// Parse a status a caller may assign when writing a post; anything else becomes `publish`.
    pub fn writable_or_publish(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("draft") => Self::Draft,
            Some("pending") => Self::Pending,
            _ => Self::Publish,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "publish" => Ok(Self::Publish),
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "private" => Ok(Self::Private),
            "future" => Ok(Self::Future),
            _ => Err(()),
        }
    }
}

/// A post as stored by the content backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    /// Backend-assigned identifier.
    pub id: u64,
    /// Post title.
    pub title: String,
    /// Sanitized HTML body.
    pub body: String,
    /// Publication state.
    pub status: PostStatus,
    /// Creation timestamp.
    pub created_at: OffsetDateTime,
    /// Public URL.
    pub permalink: String,
    /// Key-value metadata attached to the post.
    pub metadata: BTreeMap<String, String>,
}

/// Fields for a new post.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    /// Post title.
    pub title: String,
    /// Sanitized HTML body.
    pub body: String,
    /// Initial publication state.
    pub status: PostStatus,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement sanitized body.
    pub body: Option<String>,
    /// Replacement status.
    pub status: Option<PostStatus>,
}

/// Filter for [`ContentBackend::list_posts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQuery {
    /// Restrict to one status; `None` matches every status.
    pub status: Option<PostStatus>,
    /// Maximum number of posts returned.
    pub limit: usize,
}

/// Descriptive metadata about the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInfo {
    /// Site name.
    pub name: String,
    /// Public base URL.
    pub url: String,
    /// Tagline or description.
    pub description: String,
    /// Content platform version.
    pub platform_version: String,
    /// Administrative contact.
    pub admin_email: String,
}

/// Narrow interface to the external content store.
#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// Describe the site.
    async fn site_info(&self) -> Result<SiteInfo, ContentError>;

    /// Flush any host cache layer. Returns `false` when no cache layer exists.
    async fn flush_cache(&self) -> Result<bool, ContentError>;

    /// Persist a new post and return it with its assigned id.
    async fn create_post(&self, post: NewPost) -> Result<ContentItem, ContentError>;

    /// Merge a patch into an existing post.
    async fn update_post(&self, id: u64, patch: PostPatch) -> Result<ContentItem, ContentError>;

    /// Fetch a post by id.
    async fn get_post(&self, id: u64) -> Result<Option<ContentItem>, ContentError>;

    /// List posts ordered by creation date, newest first.
    async fn list_posts(&self, query: PostQuery) -> Result<Vec<ContentItem>, ContentError>;

    /// Attach a metadata value to a post, replacing any previous value.
    async fn set_meta(&self, id: u64, key: &str, value: &str) -> Result<(), ContentError>;

    /// Read a metadata value from a post.
    async fn get_meta(&self, id: u64, key: &str) -> Result<Option<String>, ContentError>;
}
