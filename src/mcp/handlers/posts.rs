//! Handlers for the post tools: create, update, get, and list.

use async_trait::async_trait;

use crate::content::{
    ContentError, META_CLOUDINARY_PUBLIC_ID, META_CLOUDINARY_URL, NewPost, PostPatch, PostQuery,
    PostStatus,
    sanitize::{escape_attribute, excerpt_words, sanitize_html},
};
use crate::mcp::format::{
    EXCERPT_WORDS, post_created_text, post_detail_text, post_list_text, post_updated_text,
};
use crate::mcp::protocol::{JsonObject, ToolResult};
use crate::mcp::registry::{Tool, ToolContext};

use super::{integer_arg, non_empty_string, post_id_arg, present_string};

/// Default number of posts returned by `list-posts`.
pub const DEFAULT_LIST_LIMIT: usize = 10;
/// Upper bound on posts returned by `list-posts`.
pub const MAX_LIST_LIMIT: usize = 100;

const POST_NOT_FOUND: &str = "Post not found";
const POST_ID_REQUIRED: &str = "post_id is required";

/// Validated `create-post` arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePostInput {
    /// Trimmed title.
    pub title: String,
    /// Raw content as supplied.
    pub content: String,
    /// Status after coercion.
    pub status: PostStatus,
    /// Image embedded ahead of the content.
    pub cloudinary_url: Option<String>,
    /// Cloudinary public id stored as metadata.
    pub cloudinary_public_id: Option<String>,
}

/// `create-post`: persist a new post, optionally headed by a Cloudinary image.
pub struct CreatePostTool;

#[async_trait]
impl Tool for CreatePostTool {
    type Input = CreatePostInput;

    fn validate(&self, arguments: &JsonObject) -> Result<Self::Input, ToolResult> {
        let (Some(title), Some(_)) = (
            non_empty_string(arguments, "title"),
            non_empty_string(arguments, "content"),
        ) else {
            return Err(ToolResult::error("title and content are required"));
        };

        Ok(CreatePostInput {
            title,
            content: present_string(arguments, "content").unwrap_or_default(),
            status: PostStatus::writable_or_publish(
                arguments.get("status").and_then(|value| value.as_str()),
            ),
            cloudinary_url: non_empty_string(arguments, "cloudinary_url"),
            cloudinary_public_id: non_empty_string(arguments, "cloudinary_public_id"),
        })
    }

    async fn run(&self, ctx: &ToolContext, input: CreatePostInput) -> ToolResult {
        let body = match input.cloudinary_url.as_deref() {
            Some(url) => format!(
                "<img src=\"{}\" alt=\"{}\" class=\"cloudinary-image\" />\n\n{}",
                escape_attribute(url),
                escape_attribute(&input.title),
                input.content
            ),
            None => input.content,
        };

        let post = match ctx
            .content
            .create_post(NewPost {
                title: input.title,
                body: sanitize_html(&body),
                status: input.status,
            })
            .await
        {
            Ok(post) => post,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to create post");
                return ToolResult::error(format!("Failed to create post: {err}"));
            }
        };

        let metadata = [
            (META_CLOUDINARY_PUBLIC_ID, input.cloudinary_public_id.as_deref()),
            (META_CLOUDINARY_URL, input.cloudinary_url.as_deref()),
        ];
        for (key, value) in metadata {
            if let Some(value) = value
                && let Err(err) = ctx.content.set_meta(post.id, key, value).await
            {
                tracing::warn!(
                    post_id = post.id,
                    key,
                    error = %err,
                    "Failed to store post metadata"
                );
            }
        }

        tracing::info!(post_id = post.id, status = %post.status, "Post created");
        ToolResult::text(post_created_text(&post, input.cloudinary_url.is_some()))
    }
}

/// Validated `update-post` arguments; `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePostInput {
    /// Target post.
    pub post_id: u64,
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement raw content.
    pub content: Option<String>,
    /// Replacement status after coercion.
    pub status: Option<PostStatus>,
}

/// `update-post`: merge supplied fields into an existing post.
pub struct UpdatePostTool;

#[async_trait]
impl Tool for UpdatePostTool {
    type Input = UpdatePostInput;

    fn validate(&self, arguments: &JsonObject) -> Result<Self::Input, ToolResult> {
        let post_id = post_id_arg(arguments).ok_or_else(|| ToolResult::error(POST_ID_REQUIRED))?;
        Ok(UpdatePostInput {
            post_id,
            title: present_string(arguments, "title"),
            content: present_string(arguments, "content"),
            status: present_string(arguments, "status")
                .map(|status| PostStatus::writable_or_publish(Some(&status))),
        })
    }

    async fn run(&self, ctx: &ToolContext, input: UpdatePostInput) -> ToolResult {
        match ctx.content.get_post(input.post_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return ToolResult::error(POST_NOT_FOUND),
            Err(err) => return ToolResult::error(format!("Failed to load post: {err}")),
        }

        let patch = PostPatch {
            title: input.title.map(|title| title.trim().to_string()),
            body: input.content.as_deref().map(sanitize_html),
            status: input.status,
        };

        match ctx.content.update_post(input.post_id, patch).await {
            Ok(post) => {
                tracing::info!(post_id = post.id, status = %post.status, "Post updated");
                ToolResult::text(post_updated_text(&post))
            }
            Err(ContentError::NotFound(_)) => ToolResult::error(POST_NOT_FOUND),
            Err(err) => {
                tracing::warn!(post_id = input.post_id, error = %err, "Failed to update post");
                ToolResult::error(format!("Failed to update post: {err}"))
            }
        }
    }
}

/// `get-post`: show a post with its Cloudinary metadata and a body excerpt.
pub struct GetPostTool;

#[async_trait]
impl Tool for GetPostTool {
    type Input = u64;

    fn validate(&self, arguments: &JsonObject) -> Result<Self::Input, ToolResult> {
        post_id_arg(arguments).ok_or_else(|| ToolResult::error(POST_ID_REQUIRED))
    }

    async fn run(&self, ctx: &ToolContext, post_id: u64) -> ToolResult {
        let post = match ctx.content.get_post(post_id).await {
            Ok(Some(post)) => post,
            Ok(None) => return ToolResult::error(POST_NOT_FOUND),
            Err(err) => return ToolResult::error(format!("Failed to load post: {err}")),
        };

        let public_id = read_meta(ctx, post_id, META_CLOUDINARY_PUBLIC_ID).await;
        let image_url = read_meta(ctx, post_id, META_CLOUDINARY_URL).await;
        let excerpt = excerpt_words(&post.body, EXCERPT_WORDS);

        ToolResult::text(post_detail_text(
            &post,
            public_id.as_deref(),
            image_url.as_deref(),
            &excerpt,
        ))
    }
}

async fn read_meta(ctx: &ToolContext, post_id: u64, key: &str) -> Option<String> {
    match ctx.content.get_meta(post_id, key).await {
        Ok(value) => value.filter(|value| !value.is_empty()),
        Err(err) => {
            tracing::warn!(post_id, key, error = %err, "Failed to read post metadata");
            None
        }
    }
}

/// `list-posts`: newest posts first, filtered by status.
pub struct ListPostsTool;

#[async_trait]
impl Tool for ListPostsTool {
    type Input = PostQuery;

    fn validate(&self, arguments: &JsonObject) -> Result<Self::Input, ToolResult> {
        let limit = match integer_arg(arguments, "limit") {
            Some(limit) if limit >= 1 => (limit as usize).min(MAX_LIST_LIMIT),
            _ => DEFAULT_LIST_LIMIT,
        };
        let status = match non_empty_string(arguments, "status").as_deref() {
            Some("any") => None,
            Some(label) => Some(label.parse().unwrap_or(PostStatus::Publish)),
            None => Some(PostStatus::Publish),
        };
        Ok(PostQuery { status, limit })
    }

    async fn run(&self, ctx: &ToolContext, query: PostQuery) -> ToolResult {
        match ctx.content.list_posts(query).await {
            Ok(posts) if posts.is_empty() => ToolResult::text("No posts found."),
            Ok(posts) => ToolResult::text(post_list_text(&posts)),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to list posts");
                ToolResult::error(format!("Failed to list posts: {err}"))
            }
        }
    }
}
