use futures::TryStreamExt;
use mongodb::{Client, Collection, bson::doc};
use pinwall_common::model::{
    Id, ModelValidationError,
    post::{Comment, CreatePost, Post, PostMarker},
};
use thiserror::Error;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

const POSTS_COLLECTION: &str = "posts";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("A record failed validation: {0}")]
    Validation(#[from] ModelValidationError),
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

/// Handle to the posts collection. Created once at startup and shared for the
/// process lifetime; pooling and reconnection are left to the driver defaults.
pub struct DbClient {
    posts: Collection<Post>,
}

impl DbClient {
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;

        Ok(Self {
            posts: client.database(database).collection(POSTS_COLLECTION),
        })
    }

    /// Every post in the store. Takes no filter or pagination parameters.
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let posts = self.posts.find(doc! {}).await?.try_collect().await?;

        Ok(posts)
    }

    /// Validates and inserts. A validation failure leaves the store untouched.
    pub async fn create_post(&self, create: CreatePost) -> Result<Post> {
        create.validate()?;

        let post = create.into_post();
        self.posts.insert_one(&post).await?;

        Ok(post)
    }

    pub async fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        let post = self.posts.find_one(doc! { "_id": post_id }).await?;

        Ok(post)
    }

    /// Fetch-then-replace, not an atomic `$inc`: two concurrent likes on the
    /// same post can collapse into one. Last write wins.
    pub async fn like_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        let Some(mut post) = self.fetch_post(post_id).await? else {
            return Ok(None);
        };

        post.likes += 1;
        self.replace_post(&post).await?;

        Ok(Some(post))
    }

    /// Appends in arrival order. Same fetch-then-replace caveat as
    /// [`Self::like_post`].
    pub async fn comment_post(
        &self,
        post_id: Id<PostMarker>,
        comment: Comment,
    ) -> Result<Option<Post>> {
        let Some(mut post) = self.fetch_post(post_id).await? else {
            return Ok(None);
        };

        post.comments.push(comment);
        self.replace_post(&post).await?;

        Ok(Some(post))
    }

    async fn replace_post(&self, post: &Post) -> Result<()> {
        self.posts
            .replace_one(doc! { "_id": post.id }, post)
            .await?;

        Ok(())
    }
}
