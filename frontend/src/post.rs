use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};

pub type Id = u64;

/// Markup that is allowed to reach the page without escaping.
///
/// The backend owns sanitization of post bodies. Deserialization is the one
/// place where server content is marked trusted; everything else the renderer
/// emits goes through `render::escape`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    pub fn assume_sanitized(markup: impl Into<String>) -> Self {
        TrustedHtml(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Author {
    pub id: Option<Id>,
    pub username: Option<String>,
    pub avatar: Option<String>,
}

impl Author {
    /// Single character shown in place of a missing avatar.
    pub fn initial(&self) -> char {
        self.username
            .as_deref()
            .and_then(|name| name.chars().next())
            .unwrap_or('?')
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Category {
    pub name: String,
}

/// A blog post as returned by `GET /blogs/{id}`. Any field may be missing.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Post {
    pub id: Option<Id>,
    pub title: String,
    pub content: TrustedHtml,
    pub image: Option<String>,
    pub views: u64,
    pub likes_count: u64,
    pub category: Option<Category>,
    pub user_id: Option<Id>,
    pub user: Option<Author>,
    pub created_at: Option<String>,
}

impl Post {
    pub fn author_id(&self) -> Option<Id> {
        self.user_id
            .or_else(|| self.user.as_ref().and_then(|author| author.id))
    }

    /// Both sides must be known; an anonymous viewer never owns a post.
    pub fn is_owned_by(&self, viewer: Option<Id>) -> bool {
        match (self.author_id(), viewer) {
            (Some(author), Some(viewer)) => author == viewer,
            _ => false,
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// Accepts RFC 3339 and the zone-less forms SQL backends tend to emit (read as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlogEnvelope {
    pub blog: Post,
}

/// Optional body of `POST /blogs/{id}/like`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LikeReceipt {
    pub likes_count: Option<u64>,
    pub liked: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_payload_decodes() {
        let envelope: BlogEnvelope =
            serde_json::from_str(r#"{"blog":{"title":"Hello","likes_count":5}}"#).unwrap();

        assert_eq!(envelope.blog.title, "Hello");
        assert_eq!(envelope.blog.likes_count, 5);
        assert_eq!(envelope.blog.user, None);
        assert_eq!(envelope.blog.author_id(), None);
    }

    #[test]
    fn full_payload_decodes() {
        let envelope: BlogEnvelope = serde_json::from_str(
            r#"{"blog":{
                "id": 7,
                "title": "Rust on the web",
                "content": "<p>hi</p>",
                "image": "/img/7.png",
                "views": 40,
                "likes_count": 2,
                "category": {"name": "tech"},
                "user_id": 3,
                "user": {"id": 3, "username": "ferris", "avatar": null},
                "created_at": "2024-05-01T10:00:00.000Z"
            }}"#,
        )
        .unwrap();
        let post = envelope.blog;

        assert_eq!(post.content.as_str(), "<p>hi</p>");
        assert_eq!(post.category.as_ref().unwrap().name, "tech");
        assert_eq!(post.user.as_ref().unwrap().initial(), 'f');
        assert!(post.created_at().is_some());
    }

    #[test]
    fn ownership_requires_both_ids() {
        let mut post = Post::default();
        assert!(!post.is_owned_by(None));
        assert!(!post.is_owned_by(Some(3)));

        post.user = Some(Author {
            id: Some(3),
            ..Author::default()
        });
        assert!(post.is_owned_by(Some(3)));
        assert!(!post.is_owned_by(Some(4)));

        post.user_id = Some(4);
        assert!(post.is_owned_by(Some(4)));
    }

    #[test]
    fn initial_falls_back_without_username() {
        assert_eq!(Author::default().initial(), '?');
        let author = Author {
            username: Some("élodie".into()),
            ..Author::default()
        };
        assert_eq!(author.initial(), 'é');
    }

    #[test]
    fn timestamps_without_zone_are_utc() {
        let parsed = parse_timestamp("2024-05-01 10:00:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
