pub const DEFAULT_ROOT_SELECTOR: &str = "#blog_root";
pub const TOKEN_COOKIE: &str = "token";
pub const VIEWER_LOCAL_STORAGE_KEY: &str = "blog_viewer_id";

pub fn api_base() -> &'static str {
    option_env!("BLOG_API_BASE").unwrap_or("")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for every backend path, without a trailing slash. Empty means same origin.
    pub api_base: String,
    pub root_selector: String,
    pub token_cookie: String,
    pub viewer_storage_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_base: api_base().trim_end_matches('/').to_owned(),
            root_selector: DEFAULT_ROOT_SELECTOR.to_owned(),
            token_cookie: TOKEN_COOKIE.to_owned(),
            viewer_storage_key: VIEWER_LOCAL_STORAGE_KEY.to_owned(),
        }
    }
}

impl ClientConfig {
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_owned();
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}
