//! Text rendering shared by the tool handlers.

use std::fmt::Write as _;

use time::{OffsetDateTime, macros::format_description};

use crate::content::{ContentItem, SiteInfo};
use crate::search::IndexableAsset;

/// Word budget for the body excerpt returned by `get-post`.
pub(crate) const EXCERPT_WORDS: usize = 50;

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS`.
pub(crate) fn format_date(timestamp: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    timestamp
        .format(&format)
        .unwrap_or_else(|_| timestamp.to_string())
}

pub(crate) fn site_info_text(site: &SiteInfo) -> String {
    let description = if site.description.is_empty() {
        "(none)"
    } else {
        site.description.as_str()
    };
    format!(
        "Site Name: {}\nSite URL: {}\nDescription: {}\nPlatform Version: {}\nAdmin Email: {}",
        site.name, site.url, description, site.platform_version, site.admin_email
    )
}

pub(crate) fn post_created_text(post: &ContentItem, image_embedded: bool) -> String {
    format!(
        "Post created successfully!\n\nTitle: {}\nID: {}\nStatus: {}\nURL: {}\nCloudinary Image: {}",
        post.title,
        post.id,
        post.status,
        post.permalink,
        if image_embedded { "Embedded" } else { "None" }
    )
}

pub(crate) fn post_updated_text(post: &ContentItem) -> String {
    format!(
        "Post updated successfully!\n\nTitle: {}\nID: {}\nStatus: {}\nURL: {}",
        post.title, post.id, post.status, post.permalink
    )
}

/// Full view of a post followed by a truncated body.
pub(crate) fn post_detail_text(
    post: &ContentItem,
    cloudinary_public_id: Option<&str>,
    cloudinary_url: Option<&str>,
    excerpt: &str,
) -> String {
    let mut text = format!(
        "Post ID: {}\nTitle: {}\nStatus: {}\nDate: {}\nURL: {}",
        post.id,
        post.title,
        post.status,
        format_date(post.created_at),
        post.permalink
    );
    if let Some(public_id) = cloudinary_public_id {
        let _ = write!(text, "\nCloudinary Public ID: {public_id}");
    }
    if let Some(url) = cloudinary_url {
        let _ = write!(text, "\nCloudinary URL: {url}");
    }
    let _ = write!(text, "\n\nContent:\n{excerpt}");
    text
}

pub(crate) fn post_list_text(posts: &[ContentItem]) -> String {
    let mut text = format!("Found {} posts:\n", posts.len());
    for post in posts {
        let _ = write!(
            text,
            "\n- {} (ID: {})\n  Status: {} | Date: {}\n  URL: {}\n",
            post.title,
            post.id,
            post.status,
            format_date(post.created_at),
            post.permalink
        );
    }
    text.trim_end().to_string()
}

pub(crate) fn asset_indexed_text(asset: &IndexableAsset, message: &str) -> String {
    format!(
        "Asset indexed successfully!\n\nDocument ID: {}\nResource Type: {}\nFormat: {}\nMessage: {message}",
        asset.document_id(),
        asset.resource_type,
        asset.format
    )
}

/// Failure report; the leading `Error: ` marks it as a tool-level error.
pub(crate) fn asset_index_failed_text(asset: &IndexableAsset, message: &str) -> String {
    format!(
        "Error: Failed to index asset.\n\nDocument ID: {}\nResource Type: {}\nFormat: {}\nMessage: {message}",
        asset.document_id(),
        asset.resource_type,
        asset.format
    )
}

pub(crate) fn bulk_indexed_text(count: usize, message: &str) -> String {
    format!("Bulk indexing completed successfully!\n\nAssets Indexed: {count}\nMessage: {message}")
}
