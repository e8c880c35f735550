use crate::server::{
    Json, MultipartForm, Result, ServerError, ServerRouter, upload::UploadStore,
};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum_extra::routing::{RouterExt, TypedPath};
use pinwall_common::model::{
    Id,
    post::{Comment, CreatePost, Post, PostMarker},
};
use pinwall_db::client::DbClient;
use serde::Deserialize;
use std::sync::Arc;

const FILE_FIELD: &str = "file";

pub fn routes() -> ServerRouter {
    // No upload size limits, so the default body cap comes off.
    ServerRouter::new()
        .typed_get(list_posts)
        .typed_post(create_post)
        .typed_post(like_post)
        .typed_post(comment_post)
        .layer(DefaultBodyLimit::disable())
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/posts", rejection(ServerError))]
struct ListPostsPath();

async fn list_posts(
    ListPostsPath(): ListPostsPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Vec<Post>>> {
    let posts = db.list_posts().await?;

    Ok(Json(posts))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/posts", rejection(ServerError))]
struct CreatePostPath();

async fn create_post(
    CreatePostPath(): CreatePostPath,
    State(db): State<Arc<DbClient>>,
    State(uploads): State<Arc<UploadStore>>,
    MultipartForm(mut form): MultipartForm,
) -> Result<(StatusCode, Json<Post>)> {
    let mut title = None;
    let mut content = None;
    let mut file = None;

    while let Some(field) = form.next_field().await? {
        let name = field.name().map(ToOwned::to_owned);
        match name.as_deref() {
            Some("title") => title = Some(field.text().await?),
            Some("content") => content = Some(field.text().await?),
            Some(FILE_FIELD) => {
                let original_name = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await?;
                let stored = uploads
                    .store(FILE_FIELD, &original_name, &bytes)
                    .await
                    .map_err(ServerError::Upload)?;
                file = Some(stored);
            }
            _ => {}
        }
    }

    let create = CreatePost {
        title: title.unwrap_or_default(),
        content: content.unwrap_or_default(),
        file,
    };
    let post = db.create_post(create).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/posts/like/{post_id}", rejection(ServerError))]
struct LikePostPath {
    post_id: Id<PostMarker>,
}

async fn like_post(
    LikePostPath { post_id }: LikePostPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Post>> {
    let post = db
        .like_post(post_id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(post_id))?;

    Ok(Json(post))
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
struct CommentBody {
    // A body without a text field still appends a comment, matching the
    // validation-free behavior of comments.
    #[serde(default)]
    text: String,
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/posts/comment/{post_id}", rejection(ServerError))]
struct CommentPostPath {
    post_id: Id<PostMarker>,
}

async fn comment_post(
    CommentPostPath { post_id }: CommentPostPath,
    State(db): State<Arc<DbClient>>,
    Json(CommentBody { text }): Json<CommentBody>,
) -> Result<Json<Post>> {
    let post = db
        .comment_post(post_id, Comment { text })
        .await?
        .ok_or(ServerError::PostByIdNotFound(post_id))?;

    Ok(Json(post))
}
