//! Google Fonts Loader
//!
//! Two requests per font: the `css2` stylesheet for the family/weight, then
//! the binary referenced by its `src: url(..) format('truetype')` rule.
//! A legacy desktop user agent makes the service answer with TrueType URLs.

use std::sync::{Arc, OnceLock};

use fontres_text::{BoxFuture, FontLoader, LoadOutcome, LoadParams};
use reqwest::blocking::Client;
use url::Url;

use crate::NetError;

/// Stylesheet endpoint
pub const CSS_API: &str = "https://fonts.googleapis.com/css2";

/// Old Safari user agent; newer agents are served WOFF2
pub const LEGACY_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; U; Intel Mac OS X 10_6_8; de-at) AppleWebKit/533.21.1 (KHTML, like Gecko) Version/5.0.5 Safari/533.21.1";

const MISSING_FAMILY_MARKERS: [&str; 2] = [
    "The requested font families are not available",
    "Missing family name",
];

/// Loads fonts from the Google Fonts web service
pub struct GoogleFontLoader {
    api: String,
    user_agent: String,
    /// Built on first use, on a blocking worker thread
    client: Arc<OnceLock<Client>>,
}

impl GoogleFontLoader {
    pub fn new() -> Self {
        Self::with_endpoint(CSS_API)
    }

    /// Use a different `css2`-compatible endpoint
    pub fn with_endpoint(api: &str) -> Self {
        Self {
            api: api.to_string(),
            user_agent: LEGACY_USER_AGENT.to_string(),
            client: Arc::new(OnceLock::new()),
        }
    }

    /// Override the user agent sent with stylesheet requests
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Stylesheet URL for one family/weight/style
    pub fn css_url(&self, params: &LoadParams) -> Result<Url, NetError> {
        let family = if params.italic {
            format!("{}:ital,wght@1,{}", params.family, params.weight)
        } else {
            format!("{}:wght@{}", params.family, params.weight)
        };

        let mut query = vec![("family", family)];
        match &params.text {
            Some(text) => query.push(("text", text.clone())),
            None => query.push(("subset", "latin".to_string())),
        }

        Ok(Url::parse_with_params(&self.api, &query)?)
    }
}

impl Default for GoogleFontLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLoader for GoogleFontLoader {
    fn name(&self) -> &str {
        "google-fonts"
    }

    fn load<'a>(&'a self, params: &'a LoadParams) -> BoxFuture<'a, LoadOutcome> {
        Box::pin(async move {
            let css_url = match self.css_url(params) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Cannot build stylesheet URL for {}: {}", params.family, e);
                    return LoadOutcome::NotFound;
                }
            };

            let client = Arc::clone(&self.client);
            let user_agent = self.user_agent.clone();

            tracing::info!("HTTP GET {}", css_url);
            smol::unblock(move || match shared_client(&client, &user_agent) {
                Ok(client) => fetch_font(&client, css_url),
                Err(e) => LoadOutcome::Transient(e.to_string()),
            })
            .await
        })
    }
}

fn shared_client(cell: &OnceLock<Client>, user_agent: &str) -> Result<Client, NetError> {
    if let Some(client) = cell.get() {
        return Ok(client.clone());
    }
    let client = Client::builder().user_agent(user_agent).build()?;
    Ok(cell.get_or_init(|| client).clone())
}

enum Stylesheet {
    Found(String),
    MissingFamily,
}

fn fetch_font(client: &Client, css_url: Url) -> LoadOutcome {
    let css = match fetch_stylesheet(client, css_url) {
        Ok(Stylesheet::Found(css)) => css,
        Ok(Stylesheet::MissingFamily) => return LoadOutcome::NotFound,
        Err(e) => return LoadOutcome::Transient(e.to_string()),
    };

    let Some(font_url) = extract_font_url(&css) else {
        tracing::debug!("Stylesheet has no TrueType/OpenType source");
        return LoadOutcome::NotFound;
    };

    tracing::info!("HTTP GET {}", font_url);
    match fetch_binary(client, &font_url) {
        Ok(bytes) => LoadOutcome::Loaded(bytes),
        Err(e) => LoadOutcome::Transient(e.to_string()),
    }
}

fn fetch_stylesheet(client: &Client, url: Url) -> Result<Stylesheet, NetError> {
    let response = client.get(url).send()?;
    let status = response.status();
    let body = response.text()?;

    // The service reports unknown families with a 400 and a plain-text body
    if is_missing_family(&body) {
        return Ok(Stylesheet::MissingFamily);
    }
    if !status.is_success() {
        return Err(NetError::HttpError { status: status.as_u16() });
    }
    Ok(Stylesheet::Found(body))
}

fn fetch_binary(client: &Client, url: &str) -> Result<Vec<u8>, NetError> {
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(NetError::HttpError { status: status.as_u16() });
    }

    let bytes = response.bytes()?.to_vec();
    ttf_parser::Face::parse(&bytes, 0).map_err(|e| NetError::InvalidFont(e.to_string()))?;
    Ok(bytes)
}

/// Whether a stylesheet response body reports an unknown family
pub fn is_missing_family(body: &str) -> bool {
    MISSING_FAMILY_MARKERS.iter().any(|marker| body.contains(marker))
}

/// First `src: url(..)` whose format is TrueType or OpenType
pub fn extract_font_url(css: &str) -> Option<String> {
    const SRC: &str = "src: url(";

    let mut rest = css;
    while let Some(start) = rest.find(SRC) {
        let after = &rest[start + SRC.len()..];
        let end = after.find(')')?;
        let url = after[..end].trim().trim_matches(|c| c == '\'' || c == '"');
        let tail = after[end + 1..].trim_start();

        if tail.starts_with("format('truetype')") || tail.starts_with("format('opentype')") {
            return Some(url.to_string());
        }
        rest = &after[end + 1..];
    }
    None
}
