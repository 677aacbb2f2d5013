use std::future::Future;

/// Sends a single HTTP request. The executor calls this once per attempt.
pub trait Transport {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send(
        &self,
        request: reqwest::Request,
    ) -> impl Future<Output = Result<reqwest::Response, Self::Error>> + Send;
}

impl Transport for reqwest::Client {
    type Error = reqwest::Error;

    fn send(
        &self,
        request: reqwest::Request,
    ) -> impl Future<Output = Result<reqwest::Response, Self::Error>> + Send {
        self.execute(request)
    }
}
