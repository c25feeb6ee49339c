use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Domains a match URL must mention, compared case-insensitively.
pub const RECOGNIZED_DOMAINS: [&str; 2] = ["sofascore.com", "besoccer.com"];

pub const EMPTY_URL_MESSAGE: &str = "Please enter a valid match URL.";
pub const UNRECOGNIZED_URL_MESSAGE: &str = "Please provide a valid SofaScore or BeSoccer URL.";

/// Prefix carried by every failure that happens after validation.
pub const ANALYSIS_FAILED_PREFIX: &str = "AI analysis failed: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfTimeScore {
    pub home: u32,
    pub away: u32,
}

/// One validated user request. Built per action and consumed by a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    match_url: String,
    half_time: Option<HalfTimeScore>,
}

impl PredictionRequest {
    /// Validates the URL and pairs the half-time scores.
    ///
    /// A half-time score is only kept when both sides are given.
    pub fn new(
        match_url: impl Into<String>,
        half_time_home: Option<u32>,
        half_time_away: Option<u32>,
    ) -> Result<Self> {
        let match_url = match_url.into();

        if match_url.trim().is_empty() {
            return Err(Error::validation(EMPTY_URL_MESSAGE));
        }

        let lowered = match_url.to_lowercase();
        if !RECOGNIZED_DOMAINS.iter().any(|d| lowered.contains(d)) {
            return Err(Error::validation(UNRECOGNIZED_URL_MESSAGE));
        }

        let half_time = match (half_time_home, half_time_away) {
            (Some(home), Some(away)) => Some(HalfTimeScore { home, away }),
            _ => None,
        };

        Ok(Self {
            match_url,
            half_time,
        })
    }

    pub fn match_url(&self) -> &str {
        &self.match_url
    }

    pub fn half_time(&self) -> Option<HalfTimeScore> {
        self.half_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub home_team: String,
    pub away_team: String,
    pub most_likely_score: ScoreForecast,
    pub hda_probability: HdaProbability,
    pub over_under: OverUnder,
    pub weather: Weather,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreForecast {
    pub home: u32,
    pub away: u32,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HdaProbability {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverUnder {
    #[serde(rename = "over1_5")]
    pub over_1_5: f64,
    #[serde(rename = "over2_5")]
    pub over_2_5: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub condition: String,
    pub impact: String,
}

impl Prediction {
    /// Checks team names and probability ranges. Values are never adjusted.
    pub fn validate(&self) -> Result<()> {
        if self.home_team.trim().is_empty() {
            return Err(Error::malformed("homeTeam is empty"));
        }
        if self.away_team.trim().is_empty() {
            return Err(Error::malformed("awayTeam is empty"));
        }

        let probabilities = [
            ("mostLikelyScore.probability", self.most_likely_score.probability),
            ("hdaProbability.homeWin", self.hda_probability.home_win),
            ("hdaProbability.draw", self.hda_probability.draw),
            ("hdaProbability.awayWin", self.hda_probability.away_win),
            ("overUnder.over1_5", self.over_under.over_1_5),
            ("overUnder.over2_5", self.over_under.over_2_5),
        ];

        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::malformed(format!(
                    "{} is outside [0, 1]: {}",
                    field, value
                )));
            }
        }

        Ok(())
    }
}

/// Which stage a failed request stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorKind {
    /// Rejected before any network call.
    Validation,
    #[default]
    Transport,
    EmptyResponse,
    MalformedResponse,
    /// The model itself answered with an `error` object.
    Reported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionError {
    pub error: String,
    #[serde(skip)]
    pub kind: ErrorKind,
}

impl PredictionError {
    pub fn new(kind: ErrorKind, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }
}

impl From<Error> for PredictionError {
    fn from(err: Error) -> Self {
        let kind = match err {
            Error::Validation(_) => ErrorKind::Validation,
            Error::EmptyResponse => ErrorKind::EmptyResponse,
            Error::MalformedResponse(_) | Error::Serialization(_) => ErrorKind::MalformedResponse,
            _ => ErrorKind::Transport,
        };

        let error = match kind {
            ErrorKind::Validation => err.detail(),
            _ => format!("{}{}", ANALYSIS_FAILED_PREFIX, err.detail()),
        };

        Self { error, kind }
    }
}

/// What one request resolves to. Serialises as the bare variant payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionOutcome {
    Prediction(Box<Prediction>),
    Error(PredictionError),
}

impl PredictionOutcome {
    pub fn is_prediction(&self) -> bool {
        matches!(self, Self::Prediction(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            Self::Prediction(p) => Some(p.as_ref()),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&PredictionError> {
        match self {
            Self::Prediction(_) => None,
            Self::Error(e) => Some(e),
        }
    }
}

impl From<Result<Prediction>> for PredictionOutcome {
    fn from(result: Result<Prediction>) -> Self {
        match result {
            Ok(prediction) => Self::Prediction(Box::new(prediction)),
            Err(err) => Self::Error(err.into()),
        }
    }
}
