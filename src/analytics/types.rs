use serde::Deserialize;

use super::models::StatsFilters;

/// Query string accepted by every analytics route
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsParams {
    #[serde(alias = "playerName")]
    pub player: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub team_format: Option<String>,
}

impl AnalyticsParams {
    /// Blank values are treated as absent
    fn clean(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl From<AnalyticsParams> for StatsFilters {
    fn from(params: AnalyticsParams) -> Self {
        StatsFilters {
            player: AnalyticsParams::clean(params.player),
            category: AnalyticsParams::clean(params.category),
            start_date: AnalyticsParams::clean(params.start_date),
            end_date: AnalyticsParams::clean(params.end_date),
            team_format: AnalyticsParams::clean(params.team_format),
        }
    }
}
