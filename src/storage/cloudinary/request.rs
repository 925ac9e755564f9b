//! HTTP request wrapper for provider API calls

use reqwest::header::HeaderMap;
use reqwest::multipart::Form;
use std::collections::HashMap;
use std::fmt::Display;
use std::time::Duration;

/// Error codes for provider requests
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ErrNo {
    /// Success
    SUCCESS = 0,
    /// Other error
    OTHER = 10000,
    /// HTTP status error
    STATUS = 10001,
    /// Decode error
    DECODE = 10002,
    /// Connection error
    CONNECT = 10003,
}

impl Display for ErrNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#?}", self)
    }
}

/// Uniform HTTP response type
#[derive(Debug, Clone)]
pub struct Response {
    /// Error code
    pub error_no: ErrNo,
    /// Error message
    pub error_message: String,
    /// Response body
    pub result: Vec<u8>,
    /// Response headers
    pub headers: HashMap<String, String>,
}

impl From<reqwest::Error> for Response {
    fn from(value: reqwest::Error) -> Self {
        let mut e = ErrNo::OTHER;
        if value.is_status() {
            e = ErrNo::STATUS;
        } else if value.is_connect() {
            e = ErrNo::CONNECT;
        } else if value.is_decode() {
            e = ErrNo::DECODE;
        }
        Response {
            error_no: e,
            error_message: value.to_string(),
            result: Vec::new(),
            headers: HashMap::new(),
        }
    }
}

impl Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            r#"{{"error_no": "{}","error_message": "{}","result": "{}"}}"#,
            self.error_no as i32,
            self.error_message,
            String::from_utf8_lossy(&self.result)
        )
    }
}

impl Default for Response {
    fn default() -> Self {
        Self {
            error_no: ErrNo::SUCCESS,
            error_message: Default::default(),
            result: Default::default(),
            headers: Default::default(),
        }
    }
}

/// HTTP request helper
pub struct Request;

impl Request {
    /// Build a reqwest::ClientBuilder with optional default headers
    fn get_builder_with_headers(headers: Option<&HeaderMap>) -> reqwest::ClientBuilder {
        let mut builder = reqwest::ClientBuilder::new();
        if let Some(headers) = headers {
            builder = builder.default_headers(headers.clone());
        }
        builder
    }

    /// Send a GET request
    pub async fn get(url: &str, headers: Option<&HeaderMap>) -> Result<Response, Response> {
        let client = Self::get_builder_with_headers(headers)
            .timeout(Duration::from_secs(24 * 3600))
            .build()?;
        let resp = client.get(url).send().await?;
        Self::collect(resp).await
    }

    /// Send a POST request with urlencoded form fields
    pub async fn post_form(
        url: &str,
        form: &HashMap<String, String>,
    ) -> Result<Response, Response> {
        let client = Self::get_builder_with_headers(None)
            .timeout(Duration::from_secs(24 * 3600))
            .build()?;
        let resp = client.post(url).form(form).send().await?;
        Self::collect(resp).await
    }

    /// Send a POST request with a multipart body
    pub async fn post_multipart(url: &str, form: Form) -> Result<Response, Response> {
        let client = Self::get_builder_with_headers(None)
            .timeout(Duration::from_secs(24 * 3600))
            .build()?;
        let resp = client.post(url).multipart(form).send().await?;
        Self::collect(resp).await
    }

    /// Drain a response into the uniform Response type
    async fn collect(resp: reqwest::Response) -> Result<Response, Response> {
        let status_code = resp.status();
        let mut error_no = ErrNo::SUCCESS;
        let mut message = String::new();

        if status_code.is_client_error() || status_code.is_server_error() {
            error_no = ErrNo::STATUS;
            message = status_code.to_string();
        }

        let mut headers = HashMap::new();
        for (k, v) in resp.headers() {
            headers.insert(k.to_string(), String::from_utf8_lossy(v.as_bytes()).into());
        }

        Ok(Response {
            error_no,
            error_message: message,
            result: resp.bytes().await?.to_vec(),
            headers,
        })
    }
}
