//! Record types stored in the videos table.

use serde::{Deserialize, Serialize};

/// A tracked video and its view-count history.
///
/// Serialized field names follow the store schema (`Id`, `Title`, `Channel`,
/// `LastActivityAt`, `ViewLogs`, `Created`, `Modified`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoRecord {
    /// Provider-assigned video identifier, immutable once created
    pub id: String,

    /// Video title as of the latest fetch
    pub title: String,

    /// Channel the video belongs to
    pub channel: ChannelInfo,

    /// Timestamp of the most recent completed refresh
    pub last_activity_at: i64,

    /// Append-only observation log, in chronological order
    pub view_logs: Vec<Observation>,

    /// Insertion timestamp, set exactly once
    pub created: i64,

    /// Timestamp of the last write, bumped on every mutation
    pub modified: i64,
}

/// One sampled view-count measurement. Immutable once appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Observation {
    /// View count reported by the provider
    pub views: u64,

    /// Sample time, seconds since epoch
    pub timestamp: i64,
}

/// Channel identity embedded in a video record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChannelInfo {
    /// Provider-assigned channel identifier
    pub id: String,

    /// Channel display title
    pub title: String,
}

/// Partial update for a video record.
///
/// A field is written iff it is `Some`; everything else is left untouched
/// server-side. This keeps zero-valued fields expressible: `Some(0)` writes
/// a zero, `None` writes nothing.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoRecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_logs: Option<Vec<Observation>>,
}

/// Input for recording one fetched measurement of a video.
#[derive(Debug, Clone)]
pub struct SaveVideo {
    pub id: String,
    pub title: String,
    pub channel: ChannelInfo,
    pub views: u64,
}

/// Difference between the two most recent observations of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewDelta {
    /// View count of the newest observation
    pub current: u64,

    /// Views gained since the previous observation
    pub added: i64,

    /// Timestamp of the previous observation, if one exists
    pub last_run: Option<i64>,
}

/// Computes the delta between the two most recent observations.
///
/// With fewer than two observations there is no previous run: `added` is 0
/// and `last_run` is unset. The decision is based on the observation count,
/// so a previous sample with zero views still counts as a run.
#[must_use]
pub fn view_delta(observations: &[Observation]) -> ViewDelta {
    let Some(last) = observations.last() else {
        return ViewDelta {
            current: 0,
            added: 0,
            last_run: None,
        };
    };

    let previous = observations
        .len()
        .checked_sub(2)
        .and_then(|index| observations.get(index));

    match previous {
        Some(previous) => ViewDelta {
            current: last.views,
            added: last.views as i64 - previous.views as i64,
            last_run: Some(previous.timestamp),
        },
        None => ViewDelta {
            current: last.views,
            added: 0,
            last_run: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_between_two_observations() {
        let observations = [
            Observation {
                views: 100,
                timestamp: 1_000,
            },
            Observation {
                views: 150,
                timestamp: 2_000,
            },
        ];

        let delta = view_delta(&observations);

        assert_eq!(delta.current, 150);
        assert_eq!(delta.added, 50);
        assert_eq!(delta.last_run, Some(1_000));
    }

    #[test]
    fn delta_with_single_observation() {
        let observations = [Observation {
            views: 100,
            timestamp: 1_000,
        }];

        let delta = view_delta(&observations);

        assert_eq!(delta.current, 100);
        assert_eq!(delta.added, 0);
        assert_eq!(delta.last_run, None);
    }

    #[test]
    fn delta_counts_a_zero_view_previous_sample_as_a_run() {
        let observations = [
            Observation {
                views: 0,
                timestamp: 1_000,
            },
            Observation {
                views: 30,
                timestamp: 2_000,
            },
        ];

        let delta = view_delta(&observations);

        assert_eq!(delta.added, 30);
        assert_eq!(delta.last_run, Some(1_000));
    }

    #[test]
    fn delta_can_be_negative() {
        let observations = [
            Observation {
                views: 200,
                timestamp: 1_000,
            },
            Observation {
                views: 180,
                timestamp: 2_000,
            },
        ];

        assert_eq!(view_delta(&observations).added, -20);
    }

    #[test]
    fn record_serializes_with_store_schema_names() {
        let record = VideoRecord {
            id: "abc123".to_owned(),
            title: "A video".to_owned(),
            channel: ChannelInfo {
                id: "chan1".to_owned(),
                title: "A channel".to_owned(),
            },
            last_activity_at: 2_000,
            view_logs: vec![Observation {
                views: 100,
                timestamp: 2_000,
            }],
            created: 1_000,
            modified: 2_000,
        };

        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["Id"], "abc123");
        assert_eq!(value["Channel"]["Title"], "A channel");
        assert_eq!(value["LastActivityAt"], 2_000);
        assert_eq!(value["ViewLogs"][0]["Views"], 100);
        assert_eq!(value["ViewLogs"][0]["Timestamp"], 2_000);
        assert_eq!(value["Created"], 1_000);
        assert_eq!(value["Modified"], 2_000);
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = VideoRecordPatch {
            view_logs: Some(vec![Observation {
                views: 1,
                timestamp: 10,
            }]),
            last_activity_at: Some(10),
            ..Default::default()
        };

        let value = serde_json::to_value(&patch).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert!(object.contains_key("ViewLogs"));
        assert!(object.contains_key("LastActivityAt"));
        assert!(!object.contains_key("Title"));
        assert!(!object.contains_key("Channel"));
    }
}
