use crate::model::{Id, ModelValidationError};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

/// A board post as stored and as served. The `_id` rename keeps the wire shape
/// identical to the stored document.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: Id<PostMarker>,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Owned by its parent post; comments have no identity of their own.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct Comment {
    pub text: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub file: Option<String>,
}

impl CreatePost {
    /// The only validation in the system: title and content must be non-empty.
    /// Whitespace-only values pass.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.title.is_empty() {
            return Err(ModelValidationError::MissingTitle);
        }
        if self.content.is_empty() {
            return Err(ModelValidationError::MissingContent);
        }

        Ok(())
    }

    /// Builds the post that `validate` has cleared for insertion. Fresh id,
    /// zero likes, no comments.
    #[must_use]
    pub fn into_post(self) -> Post {
        Post {
            id: Id::generate(),
            title: self.title,
            content: self.content,
            file: self.file,
            likes: 0,
            comments: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Comment, CreatePost, Post};
    use crate::model::ModelValidationError;

    fn create_post(title: &str, content: &str) -> CreatePost {
        CreatePost {
            title: title.to_owned(),
            content: content.to_owned(),
            file: None,
        }
    }

    #[test]
    fn validate_accepts_non_empty_fields() {
        let legal_posts = [
            create_post("Hello", "World"),
            create_post(" ", " "),
            create_post("title", "content with\nnewlines"),
        ];

        for legal_post in legal_posts {
            assert_eq!(legal_post.validate(), Ok(()));
        }
    }

    #[test]
    fn validate_rejects_missing_fields() {
        assert_eq!(
            create_post("", "World").validate(),
            Err(ModelValidationError::MissingTitle)
        );
        assert_eq!(
            create_post("Hello", "").validate(),
            Err(ModelValidationError::MissingContent)
        );
        assert_eq!(
            create_post("", "").validate(),
            Err(ModelValidationError::MissingTitle)
        );
    }

    #[test]
    fn into_post_starts_with_no_likes_or_comments() {
        let post = create_post("Hello", "World").into_post();

        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "World");
        assert_eq!(post.file, None);
        assert_eq!(post.likes, 0);
        assert_eq!(post.comments, Vec::new());
    }

    #[test]
    fn post_json_shape() {
        let mut post = create_post("Hello", "World").into_post();
        post.comments.push(Comment {
            text: "nice".to_owned(),
        });

        let json: serde_json::Value = serde_json::to_value(&post).unwrap();

        assert_eq!(json["_id"], serde_json::json!(post.id.to_hex()));
        assert_eq!(json["title"], serde_json::json!("Hello"));
        assert_eq!(json["content"], serde_json::json!("World"));
        assert_eq!(json["likes"], serde_json::json!(0));
        assert_eq!(json["comments"], serde_json::json!([{ "text": "nice" }]));
        // Absent attachments are omitted entirely, not serialized as null.
        assert!(json.get("file").is_none());
    }

    #[test]
    fn post_json_round_trip_with_file() {
        let mut post = create_post("Hello", "World").into_post();
        post.file = Some("file-1700000000000.png".to_owned());
        post.likes = 3;

        let json = serde_json::to_string(&post).unwrap();
        let parsed: Post = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, post);
    }
}
