use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{
    ContentBackend, ContentError, ContentItem, NewPost, PostPatch, PostQuery, SiteInfo,
};
use crate::config::SiteConfig;

/// In-process content store used when no external CMS is wired in.
pub struct MemoryContentStore {
    site: SiteInfo,
    posts: RwLock<HashMap<u64, ContentItem>>,
    next_id: AtomicU64,
    cache_flushes: AtomicU64,
}

impl MemoryContentStore {
    /// Create an empty store describing the given site.
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            site: SiteInfo {
                name: site.name.clone(),
                url: site.url.trim_end_matches('/').to_string(),
                description: site.description.clone(),
                platform_version: site.platform_version.clone(),
                admin_email: site.admin_email.clone(),
            },
            posts: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            cache_flushes: AtomicU64::new(0),
        }
    }

    /// Number of cache flushes performed since startup.
    pub fn cache_flush_count(&self) -> u64 {
        self.cache_flushes.load(Ordering::Relaxed)
    }

    fn permalink(&self, id: u64) -> String {
        format!("{}/?p={id}", self.site.url)
    }
}

#[async_trait]
impl ContentBackend for MemoryContentStore {
    async fn site_info(&self) -> Result<SiteInfo, ContentError> {
        Ok(self.site.clone())
    }

    async fn flush_cache(&self) -> Result<bool, ContentError> {
        self.cache_flushes.fetch_add(1, Ordering::Relaxed);
        Ok(true)
    }

    async fn create_post(&self, post: NewPost) -> Result<ContentItem, ContentError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let item = ContentItem {
            id,
            title: post.title,
            body: post.body,
            status: post.status,
            created_at: OffsetDateTime::now_utc(),
            permalink: self.permalink(id),
            metadata: BTreeMap::new(),
        };
        self.posts.write().await.insert(id, item.clone());
        tracing::debug!(post_id = id, status = %item.status, "Post created");
        Ok(item)
    }

    async fn update_post(&self, id: u64, patch: PostPatch) -> Result<ContentItem, ContentError> {
        let mut posts = self.posts.write().await;
        let item = posts.get_mut(&id).ok_or(ContentError::NotFound(id))?;
        if let Some(title) = patch.title {
            item.title = title;
        }
        if let Some(body) = patch.body {
            item.body = body;
        }
        if let Some(status) = patch.status {
            item.status = status;
        }
        Ok(item.clone())
    }

    async fn get_post(&self, id: u64) -> Result<Option<ContentItem>, ContentError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn list_posts(&self, query: PostQuery) -> Result<Vec<ContentItem>, ContentError> {
        let posts = self.posts.read().await;
        let mut matching: Vec<ContentItem> = posts
            .values()
            .filter(|item| query.status.is_none_or(|status| item.status == status))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        matching.truncate(query.limit);
        Ok(matching)
    }

    async fn set_meta(&self, id: u64, key: &str, value: &str) -> Result<(), ContentError> {
        let mut posts = self.posts.write().await;
        let item = posts.get_mut(&id).ok_or(ContentError::NotFound(id))?;
        item.metadata.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get_meta(&self, id: u64, key: &str) -> Result<Option<String>, ContentError> {
        let posts = self.posts.read().await;
        let item = posts.get(&id).ok_or(ContentError::NotFound(id))?;
        Ok(item.metadata.get(key).cloned())
    }
}
