//! Async HTTP client wrapping the roster JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response};
use roster_core::person::{NewPerson, Person, PersonId, RecordKind};
use serde::Deserialize;

/// Connection settings for the roster API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the roster JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Path segment of an endpoint family.
fn collection(kind: RecordKind) -> &'static str {
  match kind {
    RecordKind::Intern => "/interns",
    RecordKind::Nss => "/nss",
  }
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  pub fn base_url(&self) -> &str { &self.config.base_url }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Turn a non-2xx response into an error carrying the server's message.
  async fn check(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<ErrorBody>()
      .await
      .map(|b| b.error)
      .unwrap_or_else(|_| status.to_string());
    Err(anyhow!("{what} → {status}: {message}"))
  }

  // ── Records ───────────────────────────────────────────────────────────────

  /// `GET /interns` or `GET /nss`
  pub async fn list(&self, kind: RecordKind) -> Result<Vec<Person>> {
    let path = collection(kind);
    let resp = self
      .auth(self.client.get(self.url(path)))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    Self::check(resp, &format!("GET {path}"))
      .await?
      .json()
      .await
      .context("deserialising records")
  }

  /// `POST /interns` or `POST /nss`
  pub async fn create(&self, input: &NewPerson) -> Result<Person> {
    let path = collection(input.kind());
    let req = self.client.post(self.url(path));
    let req = match input {
      NewPerson::Intern(i) => req.json(i),
      NewPerson::Nss(n) => req.json(n),
    };
    let resp = self
      .auth(req)
      .send()
      .await
      .with_context(|| format!("POST {path} failed"))?;
    Self::check(resp, &format!("POST {path}"))
      .await?
      .json()
      .await
      .context("deserialising created record")
  }

  /// `PUT /interns/{id}` or `PUT /nss/{id}`
  pub async fn update(&self, id: PersonId, input: &NewPerson) -> Result<Person> {
    let path = format!("{}/{id}", collection(input.kind()));
    let req = self.client.put(self.url(&path));
    let req = match input {
      NewPerson::Intern(i) => req.json(i),
      NewPerson::Nss(n) => req.json(n),
    };
    let resp = self
      .auth(req)
      .send()
      .await
      .with_context(|| format!("PUT {path} failed"))?;
    Self::check(resp, &format!("PUT {path}"))
      .await?
      .json()
      .await
      .context("deserialising updated record")
  }

  /// `DELETE /interns/{id}` or `DELETE /nss/{id}`
  pub async fn delete(&self, kind: RecordKind, id: PersonId) -> Result<()> {
    let path = format!("{}/{id}", collection(kind));
    let resp = self
      .auth(self.client.delete(self.url(&path)))
      .send()
      .await
      .with_context(|| format!("DELETE {path} failed"))?;
    Self::check(resp, &format!("DELETE {path}")).await?;
    Ok(())
  }
}
