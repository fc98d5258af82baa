use crate::config::ScraperConfig;
use crate::error::Result;
use crate::scrapers::traits::Fetcher;
use crate::scrapers::types::FetchedPage;
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::{debug, warn};

/// [`Fetcher`] backed by a reqwest client
///
/// Redirects are not followed: the site redirects removed listings to the
/// category page, which must not be mistaken for the listing itself.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::none())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<FetchedPage> {
        debug!("Fetching URL: {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request for {} failed: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Request for {} returned status: {}", url, status);
            return None;
        }

        match response.text().await {
            Ok(content) => {
                debug!("Downloaded {} bytes of HTML", content.len());
                Some(FetchedPage::new(url, status.as_u16(), content))
            }
            Err(e) => {
                warn!("Failed to read response body of {}: {}", url, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&ScraperConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn returns_body_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ogl1.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/ogl1.html", server.uri());
        let page = fetcher().fetch(&url).await.unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.content, "<html>ok</html>");
        assert_eq!(page.url, url);
    }

    #[tokio::test]
    async fn non_success_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.html"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/missing.html", server.uri());
        assert!(fetcher().fetch(&url).await.is_none());
    }

    #[tokio::test]
    async fn redirects_are_not_followed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/moved.html"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", format!("{}/other.html", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/other.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("other"))
            .expect(0)
            .mount(&server)
            .await;

        let url = format!("{}/moved.html", server.uri());
        assert!(fetcher().fetch(&url).await.is_none());
    }

    #[tokio::test]
    async fn connection_failure_is_none() {
        // Nothing listens on the discard port.
        assert!(fetcher().fetch("http://127.0.0.1:9/").await.is_none());
    }
}
