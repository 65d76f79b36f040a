use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use std::time::Duration;
use tracing::debug;

use crate::domain::root_url;
use crate::error::FetchError;

/// Retrieves the content of a domain's root page.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, domain: &str) -> Result<Vec<u8>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub scheme: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            timeout: Duration::from_secs(15),
            user_agent: concat!("mailsift/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    settings: FetchSettings,
}

impl HttpFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .default_headers(headers)
            .build()?;

        Ok(Self { client, settings })
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.settings.timeout)
        } else {
            FetchError::Request(err)
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, domain: &str) -> Result<Vec<u8>, FetchError> {
        let url = root_url(&self.settings.scheme, domain).map_err(|reason| {
            FetchError::InvalidUrl {
                domain: domain.to_string(),
                reason,
            }
        })?;

        debug!(action = "request", component = "fetch", url = %url, "Fetching domain root");
        let response = self.client.get(url).send().map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().map_err(|e| self.classify(e))?;
        debug!(action = "complete", component = "fetch", domain = domain, bytes = body.len(), "Fetched domain root");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves a single canned HTTP response and returns the bound address.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "{}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        addr
    }

    fn http_fetcher() -> HttpFetcher {
        HttpFetcher::new(FetchSettings {
            scheme: "http".to_string(),
            timeout: Duration::from_secs(5),
            ..FetchSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn returns_body_on_success() {
        let addr = serve_once("HTTP/1.1 200 OK", "<p>hello@example.com</p>");
        let body = http_fetcher().fetch(&addr).unwrap();
        assert_eq!(body, b"<p>hello@example.com</p>");
    }

    #[test]
    fn non_success_status_is_an_error() {
        let addr = serve_once("HTTP/1.1 404 Not Found", "missing");
        let err = http_fetcher().fetch(&addr).unwrap_err();
        assert!(matches!(err, FetchError::Status(404)));
    }

    #[test]
    fn silent_server_hits_the_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_secs(5));
            drop(stream);
        });

        let fetcher = HttpFetcher::new(FetchSettings {
            scheme: "http".to_string(),
            timeout: Duration::from_secs(1),
            ..FetchSettings::default()
        })
        .unwrap();

        let err = fetcher.fetch(&addr).unwrap_err();
        assert!(matches!(err, FetchError::Timeout(t) if t == Duration::from_secs(1)));
    }

    #[test]
    fn invalid_domain_is_rejected_before_request() {
        let err = http_fetcher().fetch("example.com/contact").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
