use crate::element::Element;
use crate::error::{Result, RwsError};
use reqwest::blocking::Client;
use reqwest::Method;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Thin transport to the registration RESTful service. It moves payload
/// text in and out; everything it exchanges is an [`Element`] tree and
/// the callers own what those trees mean.
#[derive(Debug, Clone)]
pub struct RegRws {
    base_url: Url,
    api_key: String,
    http: Client,
}

impl RegRws {
    pub fn new(base_url: &str, api_key: impl Into<String>, user_agent: Option<&str>) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let http = Client::builder()
            .user_agent(user_agent.unwrap_or("regmate"))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            http,
        })
    }

    pub fn get_poc(&self, handle: &str) -> Result<Element> {
        self.request(Method::GET, &["poc", handle], None)
    }

    pub fn create_poc(&self, poc: &Element) -> Result<Element> {
        self.request(Method::POST, &["poc"], Some(poc))
    }

    pub fn modify_poc(&self, handle: &str, poc: &Element) -> Result<Element> {
        self.request(Method::PUT, &["poc", handle], Some(poc))
    }

    pub fn delete_poc(&self, handle: &str) -> Result<Element> {
        self.request(Method::DELETE, &["poc", handle], None)
    }

    pub fn get_ticket(&self, ticket_no: &str) -> Result<Element> {
        self.request(Method::GET, &["ticket", ticket_no], None)
    }

    /// Open-ticket summaries. The service answers with a `collection`
    /// root whose `ticket` children are returned as-is.
    pub fn get_ticket_summaries(&self) -> Result<Vec<Element>> {
        let collection = self.request(Method::GET, &["ticket"], None)?;
        Ok(collection
            .children_named("ticket")
            .cloned()
            .collect())
    }

    fn request(&self, method: Method, segments: &[&str], body: Option<&Element>) -> Result<Element> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RwsError::InvalidBaseUrl(self.base_url.to_string()))?
            .extend(segments);
        url.query_pairs_mut().append_pair("apikey", &self.api_key);

        debug!(%method, path = %url.path(), "service request");
        let mut request = self.http.request(method, url).header("Accept", "application/xml");
        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/xml")
                .body(body.to_xml());
        }

        let response = request.send()?.error_for_status()?;
        let text = response.text()?;
        Element::parse(&text)
    }
}
