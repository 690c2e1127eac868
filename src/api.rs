//! Synchronous client for the **BCB SGS** time-series API.
//!
//! Two upstream surfaces are used:
//! - the JSON data endpoint `dados/serie/bcdata.sgs.{code}/dados`, one request per
//!   series, issued sequentially in request order;
//! - the public search page (`sgspub`), which lists series metadata in an HTML table
//!   and needs a session cookie obtained from its landing page.
//!
//! ### Notes
//! - Dates go upstream as `DD/MM/YYYY`; callers pass ISO `YYYY-MM-DD`.
//! - Nothing is retried. A non-success status surfaces as [`Error::UpstreamHttp`].
//!
//! Typical usage:
//! ```no_run
//! # use sgs::Client;
//! let client = Client::new()?;
//! let table = client.dataframe([(12, "cdi"), (433, "ipca")], Some("2020-01-01"), None)?;
//! # Ok::<(), sgs::Error>(())
//! ```
use crate::error::{Error, Result};
use crate::models::{
    Codes, DateRange, Language, SearchQuery, Series, SeriesMetadata, SeriesRequest,
};
use crate::table::SeriesTable;
use crate::{parse, search};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::{Map, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.bcb.gov.br";
pub const DEFAULT_SEARCH_URL: &str = "https://www3.bcb.gov.br/sgspub";

/// Endpoints and HTTP settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root of the data API (no trailing slash).
    pub base_url: String,
    /// Root of the search application (no trailing slash).
    pub search_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    /// Ignore `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub no_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            search_url: DEFAULT_SEARCH_URL.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("sgs-rs/", env!("CARGO_PKG_VERSION")).into(),
            no_proxy: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    http: HttpClient,
}

/// Data endpoint URL for one series.
pub fn series_url(base_url: &str, code: u32, range: &DateRange) -> String {
    let mut url = format!(
        "{}/dados/serie/bcdata.sgs.{}/dados?formato=json",
        base_url.trim_end_matches('/'),
        code
    );
    for (key, value) in range.to_query_params() {
        url.push_str(&format!("&{key}={value}"));
    }
    url
}

impl Client {
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut builder = HttpClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(Policy::limited(5))
            .user_agent(config.user_agent.clone())
            .cookie_store(true);
        if config.no_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn get_json(&self, url: &str) -> Result<Value> {
        log::debug!("GET {url}");
        let resp = self.http.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::UpstreamHttp {
                status,
                url: url.to_string(),
            });
        }
        let text = resp.text()?;
        serde_json::from_str(&text)
            .map_err(|e| Error::format(format!("decode json from {url}: {e}")))
    }

    fn fetch_one(&self, req: &SeriesRequest, range: &DateRange) -> Result<Series> {
        let url = series_url(&self.config.base_url, req.code, range);
        let body = self.get_json(&url)?;
        let observations = parse::parse_observations(&body)?;
        log::debug!(
            "series {} ({}): {} observations",
            req.code,
            req.display_name,
            observations.len()
        );
        Ok(Series {
            code: req.code,
            name: req.display_name.clone(),
            observations,
        })
    }

    /// Fetch one or more series and outer-join them on date.
    ///
    /// - `codes`: a code (`12`), a list (`[12, 433]`), or a code→name mapping
    ///   (`[(12, "cdi"), (433, "ipca")]`). Column names default to the code.
    /// - `start`/`end`: optional ISO `YYYY-MM-DD` bounds, inclusive.
    ///
    /// ### Errors
    /// - [`Error::InvalidArgument`] / [`Error::InvalidDateRange`] before any request
    /// - [`Error::UpstreamHttp`], [`Error::UpstreamFormat`], [`Error::Transport`]
    pub fn dataframe(
        &self,
        codes: impl Into<Codes>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<SeriesTable> {
        let range = DateRange::parse(start, end)?;
        self.dataframe_range(codes, range)
    }

    pub fn dataframe_range(
        &self,
        codes: impl Into<Codes>,
        range: DateRange,
    ) -> Result<SeriesTable> {
        let requests = codes.into().requests()?;
        let series = requests
            .iter()
            .map(|r| self.fetch_one(r, &range))
            .collect::<Result<Vec<_>>>()?;
        Ok(SeriesTable::outer_join(series))
    }

    /// Fetch exactly one series: a single code or a single-entry mapping.
    pub fn series(
        &self,
        code: impl Into<Codes>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Series> {
        let range = DateRange::parse(start, end)?;
        self.series_range(code, range)
    }

    pub fn series_range(&self, code: impl Into<Codes>, range: DateRange) -> Result<Series> {
        let requests = code.into().requests()?;
        match requests.as_slice() {
            [one] => self.fetch_one(one, &range),
            _ => Err(Error::invalid(
                "series() takes a single code; use dataframe() for several",
            )),
        }
    }

    /// Same as [`Client::dataframe`], shaped as JSON records
    /// (`{"data": "YYYY-MM-DD", "<column>": value | null}`).
    pub fn json(
        &self,
        codes: impl Into<Codes>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<Map<String, Value>>> {
        Ok(self.dataframe(codes, start, end)?.to_records())
    }

    /// Metadata of one series, in Portuguese.
    pub fn metadata(&self, code: u32) -> Result<SeriesMetadata> {
        self.metadata_in(code, Language::default())
    }

    pub fn metadata_in(&self, code: u32, language: Language) -> Result<SeriesMetadata> {
        let wanted = code.to_string();
        let mut found = self.search_in(SearchQuery::Code(code), language)?;
        match found.iter().position(|m| m.code == wanted) {
            Some(i) => Ok(found.swap_remove(i)),
            None => found.into_iter().next().ok_or(Error::NotFound(code)),
        }
    }

    /// Search series by keyword (or by code), in Portuguese.
    pub fn search(&self, query: impl Into<SearchQuery>) -> Result<Vec<SeriesMetadata>> {
        self.search_in(query, Language::default())
    }

    pub fn search_in(
        &self,
        query: impl Into<SearchQuery>,
        language: Language,
    ) -> Result<Vec<SeriesMetadata>> {
        let query = query.into();
        if let SearchQuery::Text(t) = &query {
            if t.trim().is_empty() {
                return Err(Error::invalid("search keyword must not be empty"));
            }
        }

        let root = self.config.search_url.trim_end_matches('/');

        // The landing page sets the session cookie and the interface language.
        let landing = format!("{}/{}", root, search::landing_path(language));
        log::debug!("GET {landing}");
        let resp = self.http.get(&landing).send()?;
        if !resp.status().is_success() {
            return Err(Error::UpstreamHttp {
                status: resp.status(),
                url: landing,
            });
        }

        let url = format!("{}/{}", root, search::SEARCH_PATH);
        log::debug!("POST {url} ({query:?})");
        let resp = self
            .http
            .post(&url)
            .query(&search::form_params(&query))
            .send()?;
        if !resp.status().is_success() {
            return Err(Error::UpstreamHttp {
                status: resp.status(),
                url,
            });
        }
        let html = resp.text()?;
        search::parse_search_html(&html)
    }
}
