//! HTTP client for the ESPN fantasy v2 read API.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::cli::types::{LeagueId, Season};
use crate::config::EspnSettings;
use crate::error::{EspnError, Result};
use crate::espn::types::{Scoreboard, ScoreboardEnvelope, Standings};


const USER_AGENT: &str = concat!("espn-ffl-exporter/", env!("CARGO_PKG_VERSION"));

/// Which read view to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Standings,
    Scoreboard,
}

impl View {
    pub fn path(&self) -> &'static str {
        match self {
            View::Standings => "standings",
            View::Scoreboard => "scoreboard",
        }
    }
}

/// Read-only client for public leagues. One instance is shared by every cycle.
#[derive(Debug, Clone)]
pub struct EspnClient {
    http: Client,
    base_url: String,
}

impl EspnClient {
    pub fn new(settings: &EspnSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| EspnError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/{view}?leagueId={id}&seasonId={season}`
    pub fn view_url(&self, view: View, league_id: LeagueId, season: Season) -> String {
        format!(
            "{}/{}?leagueId={}&seasonId={}",
            self.base_url,
            view.path(),
            league_id,
            season
        )
    }

    pub async fn fetch_standings(&self, league_id: LeagueId, season: Season) -> Result<Standings> {
        self.get_view(View::Standings, league_id, season).await
    }

    pub async fn fetch_scoreboard(
        &self,
        league_id: LeagueId,
        season: Season,
    ) -> Result<Scoreboard> {
        let envelope: ScoreboardEnvelope =
            self.get_view(View::Scoreboard, league_id, season).await?;
        Ok(envelope.scoreboard)
    }

    async fn get_view<T: DeserializeOwned>(
        &self,
        view: View,
        league_id: LeagueId,
        season: Season,
    ) -> Result<T> {
        let url = self.view_url(view, league_id, season);
        debug!(%league_id, %season, url = %url, "fetching {}", view.path());

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| EspnError::transport(&url, e))?;

        let status = res.status();
        check_status(status, league_id, &url)?;

        let body = res
            .bytes()
            .await
            .map_err(|e| EspnError::transport(&url, e))?;

        decode(&body, &url)
    }
}

/// 2xx passes; 401/403 mean a private league; anything else is a transport failure.
fn check_status(status: StatusCode, league_id: LeagueId, url: &str) -> Result<()> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(EspnError::AccessDenied { league_id })
        }
        s => Err(EspnError::transport(url, format!("unexpected HTTP status {s}"))),
    }
}

/// Bytes that are not JSON are a transport problem; JSON of the wrong shape is malformed.
fn decode<T: DeserializeOwned>(body: &[u8], url: &str) -> Result<T> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| EspnError::transport(url, format!("undecodable body: {e}")))?;
    serde_json::from_value(value).map_err(|e| EspnError::malformed(format!("{url}: {e}")))
}
