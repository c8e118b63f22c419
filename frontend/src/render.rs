use chrono::{DateTime, Utc};

use crate::post::Post;
use crate::routes::{edit_path, user_path};
use crate::time::relative_time;
use crate::view::{LikeStatus, PostView, ViewState};

pub const LIKE_ACTION: &str = "like";
pub const DELETE_ACTION: &str = "delete";

const SPINNER: &str = r#"<svg aria-hidden="true" class="spinner" viewBox="0 0 100 100" fill="none" xmlns="http://www.w3.org/2000/svg"><circle cx="50" cy="50" r="45" stroke="currentColor" stroke-width="10" opacity="0.25"/><path d="M50 5a45 45 0 0 1 45 45" stroke="currentColor" stroke-width="10" stroke-linecap="round"/></svg>"#;

pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Markup for the whole page. `now` anchors the "Posted ... ago" line.
pub fn post_view_markup(view: &PostView, now: DateTime<Utc>) -> String {
    let main = match view.state() {
        ViewState::Loading => loading_markup(),
        ViewState::Failed(message) => failed_markup(message),
        ViewState::Loaded(post) => loaded_markup(view, post, now),
    };

    format!(
        r#"<div class="post-page"><div class="post-main">{}</div>{}</div>"#,
        main,
        recommended_markup(view)
    )
}

fn loading_markup() -> String {
    format!(r#"<div class="loading">{}Loading...</div>"#, SPINNER)
}

fn failed_markup(message: &str) -> String {
    format!(
        r#"<div class="load-error" role="alert">Could not load this post: {}</div>"#,
        escape(message)
    )
}

fn loaded_markup(view: &PostView, post: &Post, now: DateTime<Utc>) -> String {
    let image = match &post.image {
        Some(src) => format!(
            r#"<div><img class="post-image" src="{}" alt=""></div>"#,
            escape(src)
        ),
        None => String::new(),
    };

    let category = post
        .category
        .as_ref()
        .map(|category| category.name.as_str())
        .unwrap_or_default();

    format!(
        concat!(
            r#"{image}<div class="post-body">"#,
            r#"<div class="post-header">{author}{owner}</div>"#,
            r#"<div class="post-text"><div><h1 class="post-title">{title}</h1>"#,
            r#"<div class="post-meta"><p class="post-category">#{category}</p>"#,
            r#"<span class="post-views"><span class="icon-eye">&#128065;</span>{views}</span></div></div>"#,
            r#"<div class="post-content">{content}</div></div>"#,
            r#"<hr>{like}</div>"#
        ),
        image = image,
        author = author_markup(post, now),
        owner = owner_markup(view),
        title = escape(&post.title),
        category = escape(category),
        views = post.views,
        content = post.content,
        like = like_markup(view, post),
    )
}

fn author_markup(post: &Post, now: DateTime<Utc>) -> String {
    let author = post.user.clone().unwrap_or_default();

    let avatar = match &author.avatar {
        Some(src) => format!(r#"<img class="avatar" src="{}" alt="">"#, escape(src)),
        None => format!(
            r#"<div class="avatar avatar-fallback">{}</div>"#,
            escape(&author.initial().to_string())
        ),
    };
    let href = match post.author_id() {
        Some(id) => user_path(id),
        None => "#".to_owned(),
    };
    let posted = match post.created_at() {
        Some(created_at) => format!("Posted {}", relative_time(created_at, now)),
        None => "Posted at an unknown time".to_owned(),
    };

    format!(
        r#"<a class="author" href="{}">{}<div class="author-text"><span class="author-name">{}</span><span class="posted-at">{}</span></div></a>"#,
        escape(&href),
        avatar,
        escape(author.username.as_deref().unwrap_or_default()),
        escape(&posted)
    )
}

fn owner_markup(view: &PostView) -> String {
    match view.post_id() {
        Some(id) if view.is_owner() => format!(
            r#"<div class="owner-actions"><a class="edit" href="{}">&#128221;edit</a><button class="delete" data-action="{}">&#10060;delete</button></div>"#,
            escape(&edit_path(id)),
            DELETE_ACTION
        ),
        _ => String::new(),
    }
}

fn like_markup(view: &PostView, post: &Post) -> String {
    let (class, icon) = if view.liked() {
        ("like liked", r#"<span class="like-icon filled">&#9829;</span>"#)
    } else {
        ("like", r#"<span class="like-icon outline">&#9825;</span>"#)
    };
    let disabled = if view.like_status() == LikeStatus::Pending {
        " disabled"
    } else {
        ""
    };

    format!(
        r#"<div class="like-bar"><button class="{}" data-action="{}"{}>{}<span class="like-count">{}</span></button></div>"#,
        class, LIKE_ACTION, disabled, icon, post.likes_count
    )
}

/// The recommendation panel owns its content; it only gets a mount point
/// describing the current post.
fn recommended_markup(view: &PostView) -> String {
    match view.post() {
        Some(post) => format!(
            r#"<aside id="recommended" data-blog-id="{}" data-category="{}"></aside>"#,
            view.post_id().map(|id| id.to_string()).unwrap_or_default(),
            escape(
                post.category
                    .as_ref()
                    .map(|category| category.name.as_str())
                    .unwrap_or_default()
            )
        ),
        None => r#"<aside id="recommended"></aside>"#.to_owned(),
    }
}
