//! Travel post endpoints

use super::descriptor::{RequestDescriptor, UploadPart};
use super::{ApiClient, ClientError};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use travelog_core::IdempotencyKey;

impl ApiClient {
    /// List published posts (public endpoint)
    pub async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        self.get("/posts").await
    }

    /// Get a single post (public endpoint)
    pub async fn get_post(&self, post_id: &str) -> Result<Post, ClientError> {
        self.get(&format!("/posts/{post_id}")).await
    }

    /// Publish a post
    ///
    /// The caller keeps `key` so a retry after a lost response does not
    /// publish twice.
    pub async fn create_post(
        &self,
        post: &NewPost,
        key: IdempotencyKey,
    ) -> Result<Post, ClientError> {
        let descriptor = RequestDescriptor::authenticated(Method::POST, "/posts")
            .with_json(post)?
            .with_idempotency_key(key);
        self.execute_as(&descriptor).await
    }

    /// Comment on a post
    pub async fn add_comment(
        &self,
        post_id: &str,
        comment: &NewComment,
    ) -> Result<Comment, ClientError> {
        let descriptor =
            RequestDescriptor::authenticated(Method::POST, format!("/posts/{post_id}/comments"))
                .with_json(comment)?
                .with_idempotency_key(IdempotencyKey::generate());
        self.execute_as(&descriptor).await
    }

    /// Set the current user's rating for a post
    pub async fn rate_post(&self, post_id: &str, score: u8) -> Result<Value, ClientError> {
        self.put_authenticated(&format!("/posts/{post_id}/rating"), &Rating { score })
            .await
    }

    /// Bookmark a post; repeated calls for the same post share one key
    pub async fn bookmark_post(&self, post_id: &str) -> Result<Value, ClientError> {
        let descriptor = RequestDescriptor::authenticated(Method::POST, "/bookmarks")
            .with_json(&BookmarkRequest { post_id })?
            .with_idempotency_key(IdempotencyKey::new("bookmark_post", &[post_id]));
        self.execute(&descriptor).await
    }

    pub async fn remove_bookmark(&self, post_id: &str) -> Result<Value, ClientError> {
        self.delete_authenticated_with_body("/bookmarks", &BookmarkRequest { post_id })
            .await
    }

    /// Upload an image to attach to a post
    pub async fn upload_image(
        &self,
        file_name: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<UploadedImage, ClientError> {
        self.upload(
            "/uploads",
            vec![UploadPart::file("image", file_name, mime_type, data)],
        )
        .await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub post_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

#[derive(Serialize)]
struct Rating {
    score: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookmarkRequest<'a> {
    post_id: &'a str,
}
