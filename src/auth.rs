//! Sign-in via external identity providers
//!
//! OAuth 2 authorization-code flow against Google and GitHub. The app
//! only needs a stable user id out of this to key the profile store;
//! tokens are kept so the session survives restarts and can be cleared
//! by sign-out.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::time::Duration as StdDuration;
use url::Url;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

const GITHUB_AUTH_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_USER_URL: &str = "https://api.github.com/user";

const REDIRECT_PORT: u16 = 8899;

/// ---------------------------------------------------------------------------
/// Providers
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
  Google,
  Github,
}

impl Provider {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Google => "google",
      Self::Github => "github",
    }
  }

  fn scope(&self) -> &'static str {
    match self {
      Self::Google => "openid profile",
      Self::Github => "read:user",
    }
  }

  fn env_prefix(&self) -> &'static str {
    match self {
      Self::Google => "GOOGLE",
      Self::Github => "GITHUB",
    }
  }
}

impl std::str::FromStr for Provider {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "google" => Ok(Self::Google),
      "github" => Ok(Self::Github),
      _ => Err(format!("Unknown identity provider: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// OAuth Data Structures
/// ---------------------------------------------------------------------------

/// Resolved provider configuration. Endpoints live in the config so
/// tests can point the flow at a local server.
#[derive(Debug, Clone)]
pub struct AuthConfig {
  pub provider: Provider,
  pub client_id: String,
  pub client_secret: String,
  pub redirect_uri: String,
  pub auth_url: String,
  pub token_url: String,
  pub identity_url: String,
}

impl AuthConfig {
  pub fn from_env(provider: Provider) -> Result<Self, AuthError> {
    let prefix = provider.env_prefix();
    let client_id_var = format!("{}_CLIENT_ID", prefix);
    let client_secret_var = format!("{}_CLIENT_SECRET", prefix);

    let (auth_url, token_url, identity_url) = match provider {
      Provider::Google => (GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL),
      Provider::Github => (GITHUB_AUTH_URL, GITHUB_TOKEN_URL, GITHUB_USER_URL),
    };

    Ok(Self {
      provider,
      client_id: env::var(&client_id_var).map_err(|_| AuthError::MissingConfig(client_id_var))?,
      client_secret: env::var(&client_secret_var)
        .map_err(|_| AuthError::MissingConfig(client_secret_var))?,
      redirect_uri: format!("http://localhost:{}/callback", REDIRECT_PORT),
      auth_url: auth_url.to_string(),
      token_url: token_url.to_string(),
      identity_url: identity_url.to_string(),
    })
  }
}

/// Response from the provider token endpoint
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  /// GitHub does not issue refresh tokens by default
  pub refresh_token: Option<String>,
  /// Seconds; absent for non-expiring GitHub tokens
  pub expires_in: Option<i64>,
  pub token_type: Option<String>,
}

/// Stored token state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
  pub access_token: String,
  pub refresh_token: Option<String>,
  pub expires_at: Option<DateTime<Utc>>,
}

impl AuthTokens {
  pub fn from_response(resp: TokenResponse) -> Self {
    Self {
      access_token: resp.access_token,
      refresh_token: resp.refresh_token,
      expires_at: resp.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
    }
  }
}

/// The stable identity the rest of the app keys on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
  /// Provider-prefixed subject, e.g. "google:10876..." or "github:512..."
  pub user_id: String,
  pub display_name: Option<String>,
  pub avatar_url: Option<String>,
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("HTTP request failed: {0}")]
  Request(String),

  #[error("OAuth error: {0}")]
  OAuth(String),

  #[error("Callback server error: {0}")]
  Server(String),

  #[error("Database error: {0}")]
  Database(String),

  #[error("Not signed in")]
  NotSignedIn,
}

impl From<reqwest::Error> for AuthError {
  fn from(e: reqwest::Error) -> Self {
    AuthError::Request(e.to_string())
  }
}

impl Serialize for AuthError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// OAuth URL Generation
/// ---------------------------------------------------------------------------

pub fn build_auth_url(config: &AuthConfig) -> Result<String, AuthError> {
  let mut url = Url::parse(&config.auth_url).map_err(|e| AuthError::OAuth(e.to_string()))?;

  url
    .query_pairs_mut()
    .append_pair("client_id", &config.client_id)
    .append_pair("redirect_uri", &config.redirect_uri)
    .append_pair("response_type", "code")
    .append_pair("scope", config.provider.scope());

  Ok(url.to_string())
}

/// ---------------------------------------------------------------------------
/// Token Exchange (Authorization Code -> Tokens)
/// ---------------------------------------------------------------------------

pub async fn exchange_code_for_tokens(
  config: &AuthConfig,
  code: &str,
) -> Result<AuthTokens, AuthError> {
  let client = Client::new();

  let response = client
    .post(&config.token_url)
    // GitHub returns urlencoded unless asked for JSON; Google ignores this
    .header("Accept", "application/json")
    .form(&[
      ("client_id", config.client_id.as_str()),
      ("client_secret", config.client_secret.as_str()),
      ("code", code),
      ("redirect_uri", config.redirect_uri.as_str()),
      ("grant_type", "authorization_code"),
    ])
    .send()
    .await?;

  if !response.status().is_success() {
    let error_text = response.text().await.unwrap_or_default();
    return Err(AuthError::OAuth(format!(
      "Token exchange failed: {}",
      error_text
    )));
  }

  let token_response: TokenResponse = response.json().await?;
  Ok(AuthTokens::from_response(token_response))
}

/// ---------------------------------------------------------------------------
/// Identity Fetch
/// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
  sub: String,
  name: Option<String>,
  picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
  id: i64,
  login: String,
  name: Option<String>,
  avatar_url: Option<String>,
}

/// Fetch the signed-in identity from the provider's profile endpoint.
pub async fn fetch_identity(config: &AuthConfig, access_token: &str) -> Result<Identity, AuthError> {
  let client = Client::new();

  let response = client
    .get(&config.identity_url)
    .bearer_auth(access_token)
    // GitHub rejects requests without a User-Agent
    .header("User-Agent", "peak-progress")
    .send()
    .await?;

  if !response.status().is_success() {
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    return Err(AuthError::OAuth(format!(
      "Identity fetch failed ({}): {}",
      status, error_text
    )));
  }

  match config.provider {
    Provider::Google => {
      let info: GoogleUserInfo = response.json().await?;
      Ok(Identity {
        user_id: format!("google:{}", info.sub),
        display_name: info.name,
        avatar_url: info.picture,
      })
    }
    Provider::Github => {
      let user: GitHubUser = response.json().await?;
      Ok(Identity {
        user_id: format!("github:{}", user.id),
        display_name: user.name.or(Some(user.login)),
        avatar_url: user.avatar_url,
      })
    }
  }
}

/// ---------------------------------------------------------------------------
/// OAuth Callback Server
/// ---------------------------------------------------------------------------

pub struct SignInCallback {
  pub code: String,
}

/// Start a temporary HTTP server on the loopback, wait for the
/// provider redirect, extract the auth code.
pub fn wait_for_callback(timeout_seconds: u64) -> Result<SignInCallback, AuthError> {
  let listener = TcpListener::bind(format!("127.0.0.1:{}", REDIRECT_PORT))
    .map_err(|e| AuthError::Server(format!("Failed to bind port {}: {}", REDIRECT_PORT, e)))?;

  listener
    .set_nonblocking(true)
    .map_err(|e| AuthError::Server(e.to_string()))?;

  let start = std::time::Instant::now();
  let timeout = StdDuration::from_secs(timeout_seconds);

  loop {
    if start.elapsed() > timeout {
      return Err(AuthError::Server("Callback timeout - no response received".into()));
    }

    match listener.accept() {
      Ok((mut stream, _)) => {
        let mut buffer = [0; 2048];
        stream.read(&mut buffer).ok();

        let request = String::from_utf8_lossy(&buffer);

        if let Some(code) = extract_callback_param(&request, "code") {
          let response = callback_page(
            200,
            "Signed in!",
            "You can close this window and return to Peak Progress.",
          );
          stream.write_all(response.as_bytes()).ok();
          stream.flush().ok();

          return Ok(SignInCallback { code });
        } else if request.contains("error=") {
          let error = extract_callback_param(&request, "error")
            .unwrap_or_else(|| "Unknown error".to_string())
            .replace("%20", " ");

          let response = callback_page(400, "Sign-in failed", &error);
          stream.write_all(response.as_bytes()).ok();
          stream.flush().ok();

          return Err(AuthError::OAuth(error));
        }
      }
      Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
        std::thread::sleep(StdDuration::from_millis(100));
        continue;
      }
      Err(e) => {
        return Err(AuthError::Server(e.to_string()));
      }
    }
  }
}

fn extract_callback_param(request: &str, name: &str) -> Option<String> {
  let first_line = request.lines().next()?;

  if !first_line.contains("/callback?") {
    return None;
  }

  let url_part = first_line.split_whitespace().nth(1)?;

  for param in url_part.split('?').nth(1)?.split('&') {
    let mut kv = param.split('=');
    if kv.next() == Some(name) {
      return kv.next().map(String::from);
    }
  }
  None
}

fn callback_page(status: u16, title: &str, detail: &str) -> String {
  let body = format!(
    r#"<!DOCTYPE html>
<html>
<head><title>Peak Progress - {}</title></head>
<body style="font-family: system-ui; text-align: center; padding: 50px;">
  <h1>{}</h1>
  <p>{}</p>
</body>
</html>"#,
    title, title, detail
  );

  let status_line = if status == 200 { "200 OK" } else { "400 Bad Request" };
  format!(
    "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{}",
    status_line,
    body.len(),
    body
  )
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
