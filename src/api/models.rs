//! Wire types for the Bernard backend API.

use serde::{Deserialize, Serialize};

/// One discovered business record. The backend owns the lifecycle; the
/// dashboard only reads, filters, and exports leads. `id` is the stable
/// selection key; every other field besides `name` may be absent.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub website_status: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews: Option<i64>,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub niche: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl Lead {
    /// Whether the lead has a scraped website URL.
    pub fn has_website(&self) -> bool {
        self.website.as_deref().is_some_and(|url| !url.trim().is_empty())
    }
}

/// One scan execution record. `finished_at` is `None` while the backend
/// still considers the run in progress.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Run {
    pub id: i64,
    #[serde(default)]
    pub started_at: String,
    #[serde(default)]
    pub finished_at: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub niche: String,
    #[serde(default)]
    pub max_leads: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub total_leads: i64,
}

/// Aggregate counters, replaced wholesale on every poll.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub total_leads: i64,
    #[serde(default)]
    pub total_runs: i64,
    #[serde(default)]
    pub latest_run: Option<Run>,
    #[serde(default)]
    pub is_running: Option<bool>,
}

/// Snapshot returned by `/api/status`. Logs replace the locally held
/// buffer; the backend owns ordering and retention.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    #[serde(default)]
    pub is_running: bool,
    #[serde(default)]
    pub logs: Vec<String>,
}

/// Data-source toggles carried inside the scan config.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SourceToggles {
    #[serde(default = "default_true")]
    pub google_maps: bool,
    #[serde(default)]
    pub yelp: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SourceToggles {
    fn default() -> Self {
        Self {
            google_maps: true,
            yelp: false,
        }
    }
}

/// The operator's scan target, owned by the backend. The Settings view
/// keeps a local draft that only becomes authoritative after a save
/// round-trip succeeds.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfig {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub niche: String,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub channel_filter: String,
    #[serde(default)]
    pub max_leads: i64,
    #[serde(default)]
    pub sources: SourceToggles,
}

/// What a scan should search for: the preset city/niche pair, or the
/// free-text query plus natural-language channel filter that supersedes
/// it when both fields are filled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanTarget {
    CityNiche { city: String, niche: String },
    Query {
        search_query: String,
        channel_filter: String,
    },
}

impl ScanTarget {
    /// Both required fields must be non-empty before a scan may start.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::CityNiche { city, niche } => {
                !city.trim().is_empty() && !niche.trim().is_empty()
            }
            Self::Query {
                search_query,
                channel_filter,
            } => !search_query.trim().is_empty() && !channel_filter.trim().is_empty(),
        }
    }

    /// Short human-readable form used in status messages.
    pub fn describe(&self) -> String {
        match self {
            Self::CityNiche { city, niche } => format!("{niche} in {city}"),
            Self::Query { search_query, .. } => format!("\"{search_query}\""),
        }
    }

    /// JSON body for the scan-start endpoints.
    pub(crate) fn body(&self) -> serde_json::Value {
        match self {
            Self::CityNiche { city, niche } => serde_json::json!({
                "city": city,
                "niche": niche,
            }),
            Self::Query {
                search_query,
                channel_filter,
            } => serde_json::json!({
                "searchQuery": search_query,
                "channelFilter": channel_filter,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lead_with_sparse_fields() {
        let json = r#"{ "id": 7, "name": "Joe's Diner", "phone": "555-0101", "created_at": "2025-08-01T12:00:00Z" }"#;
        let lead: Lead = serde_json::from_str(json).unwrap();
        assert_eq!(lead.id, 7);
        assert_eq!(lead.name, "Joe's Diner");
        assert_eq!(lead.phone.as_deref(), Some("555-0101"));
        assert!(lead.email.is_none());
        assert!(!lead.has_website());
    }

    #[test]
    fn parses_status_snapshot() {
        let json = r#"{ "isRunning": true, "logs": ["a", "b"] }"#;
        let status: StatusSnapshot = serde_json::from_str(json).unwrap();
        assert!(status.is_running);
        assert_eq!(status.logs, vec!["a", "b"]);
    }

    #[test]
    fn parses_stats_with_latest_run() {
        let json = r#"{
            "totalLeads": 120,
            "totalRuns": 4,
            "latestRun": { "id": 4, "city": "Miami", "niche": "Dentists", "total_leads": 30 }
        }"#;
        let stats: Stats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_leads, 120);
        assert_eq!(stats.total_runs, 4);
        let run = stats.latest_run.unwrap();
        assert_eq!(run.city, "Miami");
        assert!(run.finished_at.is_none());
    }

    #[test]
    fn scan_config_round_trips_camel_case() {
        let config = ScanConfig {
            city: "Raleigh".into(),
            niche: "Restaurants".into(),
            max_leads: 50,
            ..ScanConfig::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["maxLeads"], 50);
        assert_eq!(json["searchQuery"], "");
        let back: ScanConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn city_niche_target_serializes_plain_fields() {
        let target = ScanTarget::CityNiche {
            city: "Miami".into(),
            niche: "Gyms".into(),
        };
        assert_eq!(
            target.body(),
            serde_json::json!({ "city": "Miami", "niche": "Gyms" })
        );
    }

    #[test]
    fn query_target_serializes_camel_case_fields() {
        let target = ScanTarget::Query {
            search_query: "Miami, FL".into(),
            channel_filter: "Dentists rating > 4.5".into(),
        };
        assert_eq!(
            target.body(),
            serde_json::json!({
                "searchQuery": "Miami, FL",
                "channelFilter": "Dentists rating > 4.5",
            })
        );
    }

    #[test]
    fn target_validity_requires_both_fields() {
        let empty_filter = ScanTarget::Query {
            search_query: "Dentists".into(),
            channel_filter: "  ".into(),
        };
        assert!(!empty_filter.is_valid());
        let full = ScanTarget::CityNiche {
            city: "Atlanta".into(),
            niche: "Salons".into(),
        };
        assert!(full.is_valid());
    }
}
