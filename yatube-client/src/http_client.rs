use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ClientError;
use crate::{AuthResponse, Comment, Follow, Group, Page, Post, PostInput};

#[derive(Clone)]
pub struct YatubeClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl YatubeClient {
    pub fn connect(endpoint: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: endpoint.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => req.header(AUTHORIZATION, format!("Bearer {token}")),
            None => req,
        }
    }

    async fn expect_success(resp: Response) -> Result<Response, ClientError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(ClientError::from_http_response(resp).await)
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = Self::expect_success(req.send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.fetch(self.request(method, path).json(body)).await
    }

    async fn authenticate(&mut self, path: &str, body: serde_json::Value) -> Result<AuthResponse, ClientError> {
        let auth: AuthResponse = self.send_json(Method::POST, path, &body).await?;
        self.token = Some(auth.access_token.clone());
        Ok(auth)
    }

    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        self.authenticate(
            "auth/register/",
            json!({ "username": username, "email": email, "password": password }),
        )
        .await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        self.authenticate(
            "jwt/create/",
            json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn verify_token(&self) -> Result<bool, ClientError> {
        let Some(token) = self.token.as_deref() else {
            return Ok(false);
        };
        let resp = self
            .request(Method::POST, "jwt/verify/")
            .json(&json!({ "token": token }))
            .send()
            .await?;
        match Self::expect_success(resp).await {
            Ok(_) => Ok(true),
            Err(ClientError::Unauthorized(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub async fn list_posts(&self, limit: Option<u32>, offset: Option<u32>) -> Result<Page<Post>, ClientError> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset));
        }
        self.fetch(self.request(Method::GET, "posts/").query(&query)).await
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, ClientError> {
        self.fetch(self.request(Method::GET, &format!("posts/{id}/"))).await
    }

    pub async fn create_post(&self, input: &PostInput) -> Result<Post, ClientError> {
        self.send_json(Method::POST, "posts/", input).await
    }

    /// Partial update: only the fields set in `input` change.
    pub async fn update_post(&self, id: Uuid, input: &PostInput) -> Result<Post, ClientError> {
        self.send_json(Method::PATCH, &format!("posts/{id}/"), input).await
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), ClientError> {
        let resp = self.request(Method::DELETE, &format!("posts/{id}/")).send().await?;
        Self::expect_success(resp).await.map(|_| ())
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>, ClientError> {
        self.fetch(self.request(Method::GET, "groups/")).await
    }

    pub async fn get_group(&self, id: Uuid) -> Result<Group, ClientError> {
        self.fetch(self.request(Method::GET, &format!("groups/{id}/"))).await
    }

    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, ClientError> {
        self.fetch(self.request(Method::GET, &format!("posts/{post_id}/comments/")))
            .await
    }

    pub async fn get_comment(&self, post_id: Uuid, id: Uuid) -> Result<Comment, ClientError> {
        self.fetch(self.request(Method::GET, &format!("posts/{post_id}/comments/{id}/")))
            .await
    }

    pub async fn create_comment(&self, post_id: Uuid, text: &str) -> Result<Comment, ClientError> {
        self.send_json(
            Method::POST,
            &format!("posts/{post_id}/comments/"),
            &json!({ "text": text }),
        )
        .await
    }

    pub async fn update_comment(&self, post_id: Uuid, id: Uuid, text: &str) -> Result<Comment, ClientError> {
        self.send_json(
            Method::PATCH,
            &format!("posts/{post_id}/comments/{id}/"),
            &json!({ "text": text }),
        )
        .await
    }

    pub async fn delete_comment(&self, post_id: Uuid, id: Uuid) -> Result<(), ClientError> {
        let resp = self
            .request(Method::DELETE, &format!("posts/{post_id}/comments/{id}/"))
            .send()
            .await?;
        Self::expect_success(resp).await.map(|_| ())
    }

    pub async fn list_follows(&self, search: Option<&str>) -> Result<Vec<Follow>, ClientError> {
        let mut req = self.request(Method::GET, "follow/");
        if let Some(search) = search {
            req = req.query(&[("search", search)]);
        }
        self.fetch(req).await
    }

    pub async fn follow(&self, username: &str) -> Result<Follow, ClientError> {
        self.send_json(Method::POST, "follow/", &json!({ "following": username }))
            .await
    }
}
