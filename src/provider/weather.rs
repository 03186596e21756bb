//! Weather payload types and the HTTP weather source.
//!
//! The payload keeps the record shape the dashboard formatter expects: an
//! array of records, each with `location`, `current` and `forecast` fields.
//! [`WttrSource`] fills that shape from the wttr.in JSON API.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{FetchError, FetchFuture, Fetcher};

/// Default wttr.in endpoint.
const DEFAULT_BASE_URL: &str = "https://wttr.in";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Temperature unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DegreeType {
    #[default]
    F,
    C,
}

impl fmt::Display for DegreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegreeType::F => write!(f, "F"),
            DegreeType::C => write!(f, "C"),
        }
    }
}

impl FromStr for DegreeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "F" | "f" => Ok(DegreeType::F),
            "C" | "c" => Ok(DegreeType::C),
            other => Err(format!("unknown degree type '{}' (expected F or C)", other)),
        }
    }
}

/// Parameters forwarded to the weather source. Compared structurally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub search: String,
    pub degree_type: DegreeType,
}

impl Default for WeatherQuery {
    fn default() -> Self {
        Self {
            search: "Pune, In".to_string(),
            degree_type: DegreeType::F,
        }
    }
}

/// A temperature value as delivered by the source: either a JSON number or a
/// numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Number(f64),
    Text(String),
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Number(n) => write!(f, "{}", n),
            Reading::Text(s) => write!(f, "{}", s.trim()),
        }
    }
}

impl From<i32> for Reading {
    fn from(n: i32) -> Self {
        Reading::Number(f64::from(n))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub degreetype: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Current {
    pub temperature: Reading,
    pub skytext: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub low: Reading,
    pub high: Reading,
}

/// One weather record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub location: Location,
    pub current: Current,
    /// Forecast periods; index 0 is today, index 1 the next day.
    #[serde(default)]
    pub forecast: Vec<Forecast>,
}

/// Complete payload of one weather lookup.
pub type WeatherReport = Vec<WeatherRecord>;

// ---------------------------------------------------------------------------
// wttr.in
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct WttrResponse {
    #[serde(default)]
    current_condition: Vec<WttrCurrent>,
    #[serde(default)]
    nearest_area: Vec<WttrArea>,
    #[serde(default)]
    weather: Vec<WttrDay>,
}

#[derive(Debug, Deserialize)]
struct WttrValue {
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WttrCurrent {
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "temp_F")]
    temp_f: String,
    #[serde(default)]
    weather_desc: Vec<WttrValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WttrArea {
    #[serde(default)]
    area_name: Vec<WttrValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WttrDay {
    mintemp_c: String,
    maxtemp_c: String,
    mintemp_f: String,
    maxtemp_f: String,
}

fn into_report(resp: WttrResponse, unit: DegreeType) -> Result<WeatherReport, FetchError> {
    let current = resp
        .current_condition
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::Decode("no current_condition".to_string()))?;

    let name = resp
        .nearest_area
        .into_iter()
        .next()
        .and_then(|a| a.area_name.into_iter().next())
        .map(|v| v.value)
        .unwrap_or_default();

    let skytext = current
        .weather_desc
        .into_iter()
        .next()
        .map(|v| v.value.trim().to_string())
        .unwrap_or_default();

    let temperature = match unit {
        DegreeType::F => current.temp_f,
        DegreeType::C => current.temp_c,
    };

    let forecast = resp
        .weather
        .into_iter()
        .map(|day| {
            let (low, high) = match unit {
                DegreeType::F => (day.mintemp_f, day.maxtemp_f),
                DegreeType::C => (day.mintemp_c, day.maxtemp_c),
            };
            Forecast {
                low: Reading::Text(low),
                high: Reading::Text(high),
            }
        })
        .collect();

    Ok(vec![WeatherRecord {
        location: Location {
            degreetype: unit.to_string(),
            name,
        },
        current: Current {
            temperature: Reading::Text(temperature),
            skytext,
        },
        forecast,
    }])
}

fn request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_decode() {
        FetchError::Decode(e.to_string())
    } else {
        FetchError::Request(e.to_string())
    }
}

/// Weather source backed by `wttr.in`.
#[derive(Clone)]
pub struct WttrSource {
    client: reqwest::Client,
    base_url: String,
}

impl WttrSource {
    /// Creates a source with the default endpoint and request timeout.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("devboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(request_error)?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Overrides the endpoint (used for self-hosted wttr instances).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url_for(&self, search: &str) -> Result<reqwest::Url, FetchError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| FetchError::Request(format!("bad base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Request("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .push(search);
        url.query_pairs_mut().append_pair("format", "j1");
        Ok(url)
    }
}

impl Fetcher<WeatherQuery, WeatherReport> for WttrSource {
    fn fetch(&self, params: &WeatherQuery) -> FetchFuture<WeatherReport> {
        let client = self.client.clone();
        let unit = params.degree_type;
        let url = self.url_for(&params.search);

        Box::pin(async move {
            let url = url?;
            debug!(%url, "requesting weather");
            let resp = client.get(url).send().await.map_err(request_error)?;
            let status = resp.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }
            let bytes = resp.bytes().await.map_err(request_error)?;
            let body: WttrResponse = serde_json::from_slice(&bytes)
                .map_err(|e| FetchError::Decode(e.to_string()))?;
            into_report(body, unit)
        })
    }
}
