use crate::post::Id;

pub const HOME_PATH: &str = "/";

pub fn post_page_path(id: Id) -> String {
    format!("/blogs/{}", id)
}

pub fn edit_path(id: Id) -> String {
    format!("/blogs/{}/edit", id)
}

pub fn user_path(id: Id) -> String {
    format!("/users/{}", id)
}

/// Ids cross the JS boundary as strings so the full `u64` range survives.
pub fn parse_id(raw: &str) -> Option<Id> {
    raw.trim().parse().ok()
}

/// Extracts the id from `/blogs/{id}`, tolerating a trailing slash.
pub fn post_id_from_path(path: &str) -> Option<Id> {
    let mut segments = path.trim_matches('/').split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some("blogs"), Some(id), None) => parse_id(id),
        _ => None,
    }
}
