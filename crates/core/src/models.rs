use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One hit from the site search. `id` is the canonical URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchCandidate {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChapterRecord {
    pub id: String,
    pub number: f64,
    pub title: String,
    pub url: String,
}

/// A reader image. `headers` must be sent when the image is fetched or the
/// origin rejects the hotlink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRecord {
    pub url: String,
    pub page: u32,
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    pub can_search: bool,
    pub supports_manga_search: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            can_search: true,
            supports_manga_search: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_serialize_camel_case() {
        let json = serde_json::to_value(ProviderSettings::default()).unwrap();
        assert_eq!(json["canSearch"], true);
        assert_eq!(json["supportsMangaSearch"], true);
    }

    #[test]
    fn candidate_without_image_omits_field() {
        let c = SearchCandidate {
            id: "https://x/manga/a".into(),
            title: "A".into(),
            url: "https://x/manga/a".into(),
            image: None,
        };
        let json = serde_json::to_string(&c).unwrap();
        assert!(!json.contains("image"));
    }
}
