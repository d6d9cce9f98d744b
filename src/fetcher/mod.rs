pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

/// Timeout applied to every upstream and webhook request, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

#[async_trait]
pub trait Fetcher {
    /// GET `url` and return the response body.
    ///
    /// Non-success statuses are errors.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::Fetcher;
    use crate::app::{NotifierError, Result};

    /// In-memory fetcher serving canned bodies and recording every request.
    #[derive(Default)]
    pub struct StubFetcher {
        bodies: HashMap<String, Vec<u8>>,
        requests: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_body(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.bodies.insert(url.to_string(), body.into());
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        pub fn request_count(&self, url: &str) -> usize {
            self.requests().iter().filter(|u| u.as_str() == url).count()
        }
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.requests.lock().unwrap().push(url.to_string());
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| NotifierError::Other(format!("no stub for {}", url)))
        }
    }
}
