use async_trait::async_trait;

use crate::error::ApiError;
use crate::post::{Id, LikeReceipt, Post};

pub const TOKEN_HEADER: &str = "token";

pub fn post_path(id: Id) -> String {
    format!("/blogs/{}", id)
}

pub fn delete_path(id: Id) -> String {
    format!("/blogs/{}/delete", id)
}

pub fn like_path(id: Id) -> String {
    format!("/blogs/{}/like", id)
}

/// The three backend calls the post page makes.
#[async_trait(?Send)]
pub trait BlogApi {
    async fn fetch_post(&self, id: Id) -> Result<Post, ApiError>;

    async fn delete_post(&self, id: Id, token: Option<&str>) -> Result<(), ApiError>;

    /// `Ok(None)` when the backend answers without a readable body.
    async fn toggle_like(&self, id: Id, token: Option<&str>)
        -> Result<Option<LikeReceipt>, ApiError>;
}

/// Like responses are advisory; an empty or foreign body is not an error.
pub fn parse_like_receipt(body: &str) -> Option<LikeReceipt> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<LikeReceipt>(body) {
        Ok(receipt) if receipt.likes_count.is_some() || receipt.liked.is_some() => Some(receipt),
        Ok(_) => None,
        Err(err) => {
            log::debug!("like response is not a receipt: {}", err);
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use self::http::HttpBlogApi;

#[cfg(target_arch = "wasm32")]
mod http {
    use gloo_net::http::{Request, RequestBuilder, Response};

    use super::*;
    use crate::config::ClientConfig;
    use crate::post::BlogEnvelope;

    /// `BlogApi` over `fetch`, via gloo-net.
    pub struct HttpBlogApi {
        config: ClientConfig,
    }

    impl HttpBlogApi {
        pub fn new(config: ClientConfig) -> Self {
            HttpBlogApi { config }
        }
    }

    fn with_token(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.header(TOKEN_HEADER, token),
            None => request,
        }
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;

        if response.ok() {
            Ok(response)
        } else {
            Err(ApiError::Status(response.status()))
        }
    }

    #[async_trait(?Send)]
    impl BlogApi for HttpBlogApi {
        async fn fetch_post(&self, id: Id) -> Result<Post, ApiError> {
            let url = self.config.url(&post_path(id));
            log::debug!("GET {}", url);

            let envelope = send(Request::get(&url))
                .await?
                .json::<BlogEnvelope>()
                .await
                .map_err(|err| ApiError::Decode(err.to_string()))?;

            Ok(envelope.blog)
        }

        async fn delete_post(&self, id: Id, token: Option<&str>) -> Result<(), ApiError> {
            let url = self.config.url(&delete_path(id));
            log::debug!("DELETE {}", url);

            send(with_token(Request::delete(&url), token)).await?;
            Ok(())
        }

        async fn toggle_like(
            &self,
            id: Id,
            token: Option<&str>,
        ) -> Result<Option<LikeReceipt>, ApiError> {
            let url = self.config.url(&like_path(id));
            log::debug!("POST {}", url);

            let response = send(with_token(Request::post(&url), token)).await?;
            let body = response.text().await.unwrap_or_default();

            Ok(parse_like_receipt(&body))
        }
    }
}
