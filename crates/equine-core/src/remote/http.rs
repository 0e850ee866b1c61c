//! reqwest blocking transport.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Method as HttpMethod;

use super::{Method, RemoteError, RemoteResult, Request, Response, Transport};

/// PostgREST transport for a hosted project (`<url>/rest/v1/<table>`).
pub struct HttpTransport {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &Request) -> RemoteResult<Response> {
        let method = match request.method {
            Method::Get => HttpMethod::GET,
            Method::Post => HttpMethod::POST,
            Method::Patch => HttpMethod::PATCH,
            Method::Delete => HttpMethod::DELETE,
        };

        let mut builder = self
            .client
            .request(method, self.url(request.table))
            .query(&request.query)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        Ok(Response { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_trims_trailing_slash() {
        let transport =
            HttpTransport::new("https://clinic.example.co/", "key", Duration::from_secs(5)).unwrap();
        assert_eq!(
            transport.url("pacientes"),
            "https://clinic.example.co/rest/v1/pacientes"
        );
    }

    #[test]
    fn test_unreachable_host_is_transport_error() {
        let transport =
            HttpTransport::new("http://127.0.0.1:9", "key", Duration::from_millis(200)).unwrap();
        let request = Request::new(Method::Get, "pacientes");
        let err = transport.execute(&request).unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
    }
}
