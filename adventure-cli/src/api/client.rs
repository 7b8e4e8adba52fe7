use adventure_core::{CellKey, GridMonth};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    cookie::{CookieStore, Jar},
    Client, RequestBuilder, Response, StatusCode, Url,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::dto::{
    CategoryDto, CellCommitDto, CommitCellRequest, CreateCategoryRequest, CredentialsRequest,
    ErrorDto, GridDto, MeDto,
};
use crate::sheet::{CellCommitter, GridLoader};

const SESSION_COOKIE: &str = "id";
const UNAUTH_INVALID_SESSION: &str =
    "Session expired or invalid. Run `adventure-cli login` to authenticate.";
const UNAUTH_BAD_CREDENTIALS: &str = "Invalid email or password.";

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    jar: Arc<Jar>,
}

impl ApiClient {
    pub fn new(base_url: &str, session_id: Option<&str>) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid API URL: {}", base_url))?;
        let jar = Arc::new(Jar::default());

        if let Some(session_id) = session_id {
            jar.add_cookie_str(
                &format!("{}={}; Path=/", SESSION_COOKIE, session_id),
                &base_url,
            );
        }

        let client = Client::builder()
            .cookie_provider(jar.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            jar,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Failed to build URL for path {}", path))
    }

    /// Current value of the session cookie, if the server set one.
    pub fn session_id(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        let header = header.to_str().ok()?;
        session_from_cookie_header(header)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        call_name: &str,
        unauthorized_message: &str,
    ) -> Result<Response> {
        tracing::debug!("calling {}", call_name);
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to call {}. Is adventure-api running?", call_name))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            anyhow::bail!("{unauthorized_message}");
        }
        if !status.is_success() {
            let message = match response.json::<ErrorDto>().await {
                Ok(body) => body.error,
                Err(_) => status.to_string(),
            };
            anyhow::bail!("{} returned {}: {}", call_name, status.as_u16(), message);
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
        unauthorized_message: &str,
    ) -> Result<T> {
        let response = self.send(request, call_name, unauthorized_message).await?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse {} response", call_name))
    }

    pub async fn signup(&self, email: &str, password: &str) -> Result<MeDto> {
        self.get_json(
            self.client
                .post(self.endpoint("/signup")?)
                .json(&CredentialsRequest { email, password }),
            "POST /signup",
            UNAUTH_BAD_CREDENTIALS,
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<MeDto> {
        self.get_json(
            self.client
                .post(self.endpoint("/login")?)
                .json(&CredentialsRequest { email, password }),
            "POST /login",
            UNAUTH_BAD_CREDENTIALS,
        )
        .await
    }

    pub async fn logout(&self) -> Result<()> {
        let response = self
            .send(
                self.client.post(self.endpoint("/logout")?),
                "POST /logout",
                UNAUTH_INVALID_SESSION,
            )
            .await?;
        let _ = response.bytes().await;
        Ok(())
    }

    pub async fn grid(&self, month: Option<GridMonth>) -> Result<GridDto> {
        let mut request = self.client.get(self.endpoint("/grid")?);
        if let Some(month) = month {
            request = request.query(&[("month", month.to_string())]);
        }
        self.get_json(request, "GET /grid", UNAUTH_INVALID_SESSION)
            .await
    }

    pub async fn categories(&self) -> Result<Vec<CategoryDto>> {
        self.get_json(
            self.client.get(self.endpoint("/categories")?),
            "GET /categories",
            UNAUTH_INVALID_SESSION,
        )
        .await
    }

    pub async fn add_category(&self, name: &str) -> Result<CategoryDto> {
        self.get_json(
            self.client
                .post(self.endpoint("/categories")?)
                .json(&CreateCategoryRequest { name }),
            "POST /categories",
            UNAUTH_INVALID_SESSION,
        )
        .await
    }
}

#[async_trait]
impl CellCommitter for ApiClient {
    async fn commit(&self, key: CellKey, minutes: Option<u32>) -> Result<()> {
        let body = CommitCellRequest {
            day: key.day,
            category_id: key.category_id,
            minutes,
        };
        let commit: CellCommitDto = self
            .get_json(
                self.client.put(self.endpoint("/grid/cell")?).json(&body),
                "PUT /grid/cell",
                UNAUTH_INVALID_SESSION,
            )
            .await?;
        tracing::debug!(outcome = %commit.outcome, entry_id = ?commit.entry_id, "cell committed");
        Ok(())
    }
}

#[async_trait]
impl GridLoader for ApiClient {
    async fn load_cells(&self, month: GridMonth) -> Result<Vec<(CellKey, u32)>> {
        let grid = self.grid(Some(month)).await?;
        Ok(grid.cell_values().collect())
    }
}

fn session_from_cookie_header(header: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name.trim() == SESSION_COOKIE && !value.trim().is_empty())
            .then(|| value.trim().to_string())
    })
}
