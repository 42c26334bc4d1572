use serde::Deserialize;

/// A playable radio station.
///
/// Immutable value; produced by the preset list, a directory search, or a
/// raw URL typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub name: String,
    pub url: String,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub bitrate: Option<u32>,
    pub codec: Option<String>,
}

impl Station {
    /// Station built from a raw stream URL (direct-play path).
    pub fn from_url(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            genre: None,
            country: None,
            bitrate: None,
            codec: None,
        }
    }

    /// One-line summary used by the search/preset listings.
    pub fn summary(&self) -> String {
        let mut extras = Vec::new();
        if let Some(genre) = &self.genre {
            extras.push(genre.clone());
        }
        if let Some(country) = &self.country {
            extras.push(country.clone());
        }
        if let Some(bitrate) = self.bitrate {
            extras.push(format!("{}kbps", bitrate));
        }
        if let Some(codec) = &self.codec {
            extras.push(codec.clone());
        }
        if extras.is_empty() {
            self.name.clone()
        } else {
            format!("{} [{}]", self.name, extras.join(", "))
        }
    }
}

/// Raw record as returned by the radio-browser search endpoint.
///
/// Every field defaults: the directory routinely omits or nulls entries.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiStation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub url_resolved: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub bitrate: u32,
    #[serde(default)]
    pub codec: String,
    #[serde(default)]
    pub votes: i64,
    #[serde(default)]
    pub lastcheckok: u8,
}

impl From<ApiStation> for Station {
    fn from(record: ApiStation) -> Self {
        // The resolved URL already follows playlist redirects; prefer it.
        let url = if record.url_resolved.trim().is_empty() {
            record.url
        } else {
            record.url_resolved
        };

        Station {
            name: record.name.trim().to_string(),
            url,
            genre: non_empty(record.tags),
            country: non_empty(record.country),
            bitrate: (record.bitrate > 0).then_some(record.bitrate),
            codec: non_empty(record.codec),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Filter to reachable stations, order by votes descending, cap at `limit`.
pub fn map_results(mut records: Vec<ApiStation>, limit: usize) -> Vec<Station> {
    records.retain(|record| record.lastcheckok == 1);
    records.sort_by(|a, b| b.votes.cmp(&a.votes));
    records.into_iter().take(limit).map(Station::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, votes: i64, lastcheckok: u8) -> ApiStation {
        ApiStation {
            name: name.to_string(),
            url: format!("http://example.com/{}", name),
            url_resolved: String::new(),
            tags: String::new(),
            country: String::new(),
            bitrate: 0,
            codec: String::new(),
            votes,
            lastcheckok,
        }
    }

    #[test]
    fn test_broken_entries_are_dropped() {
        let records = vec![record("a", 5, 1), record("b", 9, 0), record("c", 1, 1)];
        let stations = map_results(records, 20);
        assert_eq!(stations.len(), 2);
        assert!(stations.iter().all(|s| s.name != "b"));
    }

    #[test]
    fn test_results_ordered_by_votes_descending() {
        let records = vec![record("low", 1, 1), record("high", 99, 1), record("mid", 10, 1)];
        let names: Vec<String> = map_results(records, 20)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_results_truncated_to_limit() {
        let records = (0..30).map(|i| record(&format!("s{}", i), i, 1)).collect();
        let stations = map_results(records, 20);
        assert_eq!(stations.len(), 20);

        let records = (0..3).map(|i| record(&format!("s{}", i), i, 1)).collect();
        assert_eq!(map_results(records, 20).len(), 3);
    }

    #[test]
    fn test_resolved_url_preferred() {
        let mut rec = record("x", 1, 1);
        rec.url_resolved = "http://resolved.example.com/stream".to_string();
        let stations = map_results(vec![rec], 1);
        assert_eq!(stations[0].url, "http://resolved.example.com/stream");
    }

    #[test]
    fn test_optional_fields_mapped() {
        let mut rec = record("x", 1, 1);
        rec.tags = "jazz,blues".to_string();
        rec.country = "France".to_string();
        rec.bitrate = 128;
        rec.codec = "MP3".to_string();
        let station = &map_results(vec![rec], 1)[0];
        assert_eq!(station.genre.as_deref(), Some("jazz,blues"));
        assert_eq!(station.country.as_deref(), Some("France"));
        assert_eq!(station.bitrate, Some(128));
        assert_eq!(station.codec.as_deref(), Some("MP3"));

        let station = &map_results(vec![record("bare", 1, 1)], 1)[0];
        assert_eq!(station.genre, None);
        assert_eq!(station.bitrate, None);
    }

    #[test]
    fn test_api_record_parses_with_missing_fields() {
        let json = r#"[{"name": "Minimal", "url": "http://x/s", "lastcheckok": 1}]"#;
        let records: Vec<ApiStation> = serde_json::from_str(json).unwrap();
        let stations = map_results(records, 20);
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Minimal");
    }
}
