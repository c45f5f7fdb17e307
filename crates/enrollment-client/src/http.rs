//! reqwest transport for the student REST API.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, RetryPolicy};
use crate::transport::{ApiRequest, Method, Reply, RequestBody, Transport, UploadFile};
use crate::ClientError;

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpTransport {
    /// Build a transport from the client configuration.
    ///
    /// The API base URL is stored without its trailing slash.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            retry: config.retry,
        })
    }

    fn url(&self, request: &ApiRequest) -> String {
        format!("{}{}", self.base_url, request.endpoint.path())
    }

    async fn send_once(&self, request: &ApiRequest) -> Result<Reply, ClientError> {
        let url = self.url(request);
        let method = match request.endpoint.method() {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        info!(url = %url, method = %method, "sending request");
        let builder = self
            .client
            .request(method, &url)
            .header(reqwest::header::ACCEPT, "application/json");
        let builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(files) => builder.multipart(multipart_form(files).await?),
        };

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        info!(url = %url, status, "response received");
        Ok(Reply {
            status,
            body: parse_body(&text),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Reply, ClientError> {
        let attempts = attempts_for(&self.retry, request.endpoint.method());
        with_retries(attempts, self.retry.delay, |attempt| {
            if attempt > 1 {
                warn!(url = %self.url(&request), attempt, "transport error, retrying");
            }
            self.send_once(&request)
        })
        .await
    }
}

/// Attempts allowed for `method`: the policy's count for idempotent methods, one otherwise.
fn attempts_for(retry: &RetryPolicy, method: Method) -> u32 {
    if method.is_idempotent() {
        retry.max_attempts.max(1)
    } else {
        1
    }
}

/// Call `send` until it succeeds, fails with something other than a transport
/// error, or `attempts` calls have been made. `send` receives the 1-based attempt.
async fn with_retries<F, Fut>(
    attempts: u32,
    delay: Duration,
    mut send: F,
) -> Result<Reply, ClientError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Reply, ClientError>>,
{
    let mut attempt = 1;
    loop {
        match send(attempt).await {
            Err(ClientError::Http(err)) if attempt < attempts => {
                debug!(attempt, error = %err, "request failed");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

async fn multipart_form(files: &[UploadFile]) -> Result<Form, ClientError> {
    let mut form = Form::new();
    for file in files {
        let path = Path::new(&file.path);
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.part.to_string());
        form = form.part(file.part, Part::bytes(bytes).file_name(name));
    }
    Ok(form)
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
