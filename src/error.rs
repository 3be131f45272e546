//! Error types for the ESPN fantasy football exporter

use thiserror::Error;

use crate::cli::types::{LeagueId, TeamId};


pub type Result<T> = std::result::Result<T, EspnError>;

#[derive(Error, Debug)]
pub enum EspnError {
    /// Network error, timeout, unexpected status, or a body that is not JSON.
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// ESPN refused the read. The league is private; retrying will not help.
    #[error("league {league_id} is private (access denied)")]
    AccessDenied { league_id: LeagueId },

    #[error("malformed ESPN response: {reason}")]
    MalformedResponse { reason: String },

    #[error("owner record on team {team_id} is incomplete (first name {first_name:?}, no last name)")]
    IncompleteOwnerRecord { team_id: TeamId, first_name: String },

    #[error("metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse identifier: {0}")]
    InvalidId(#[from] std::num::ParseIntError),
}

impl EspnError {
    /// Short stable label for logs and the failure counter.
    pub fn kind(&self) -> &'static str {
        match self {
            EspnError::Transport { .. } => "transport",
            EspnError::AccessDenied { .. } => "access_denied",
            EspnError::MalformedResponse { .. } => "malformed_response",
            EspnError::IncompleteOwnerRecord { .. } => "incomplete_owner_record",
            EspnError::Metrics(_) => "metrics",
            EspnError::Config { .. } => "config",
            EspnError::Io(_) => "io",
            EspnError::InvalidId(_) => "invalid_id",
        }
    }

    /// Upstream data problems, as opposed to the network or a private league.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            EspnError::MalformedResponse { .. } | EspnError::IncompleteOwnerRecord { .. }
        )
    }

    pub(crate) fn transport(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        EspnError::Transport {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        EspnError::MalformedResponse {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        EspnError::Config {
            message: message.into(),
        }
    }
}
