use std::future::Future;

use bytes::Bytes;

/// Status, advertised length and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status:         u16,
    /// Value of the `Content-Length` header, if any.
    pub content_length: Option<u64>,
    pub body:           Bytes,
}

/// Asynchronous HTTP client abstraction.
///
/// This is the minimal surface the downloader and the release listing need:
/// a `HEAD` for the content length and a `GET` with an optional `Range`
/// header. Non-success statuses are returned as responses, not errors; the
/// error type covers transport failures only.
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - in-memory doubles in tests
pub trait HttpClient: Send + Sync + 'static {
    /// Transport error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue a `HEAD` request. The returned body is empty.
    fn head(&self, url: &str) -> impl Future<Output = Result<Response, Self::Error>> + Send;

    /// Issue a `GET` request, with `Range: <range>` when `range` is given.
    fn get(
        &self,
        url: &str,
        range: Option<&str>,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_client {
    use super::*;
    use reqwest::Client;
    use reqwest::header::{CONTENT_LENGTH, HeaderMap, RANGE};

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: Client,
    }

    impl ReqwestClient {
        pub fn new() -> Result<Self, reqwest::Error> {
            let client = Client::builder()
                .user_agent(concat!("gvs/", env!("CARGO_PKG_VERSION")))
                .build()?;
            Ok(Self { client })
        }
    }

    // `Response::content_length` reports the body size hint, which is zero for
    // HEAD responses, so the header is read directly.
    fn header_length(headers: &HeaderMap) -> Option<u64> {
        headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn head(&self, url: &str) -> Result<Response, Self::Error> {
            let response = self.client.head(url).send().await?;
            Ok(Response {
                status:         response.status().as_u16(),
                content_length: header_length(response.headers()),
                body:           Bytes::new(),
            })
        }

        async fn get(&self, url: &str, range: Option<&str>) -> Result<Response, Self::Error> {
            let mut request = self.client.get(url);
            if let Some(range) = range {
                request = request.header(RANGE, range);
            }

            let response = request.send().await?;
            let status = response.status().as_u16();
            let content_length = header_length(response.headers());
            let body = response.bytes().await?;

            Ok(Response {
                status,
                content_length,
                body,
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestClient;
