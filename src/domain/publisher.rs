use serde::Deserialize;

/// One publisher from the site registry.
///
/// Loaded from `data/sites.json` and never mutated afterwards. Unknown
/// fields in the registry are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Publisher {
    pub slug: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub rss: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub mastodon: Option<String>,
    #[serde(default)]
    pub mastodon_rss: Option<String>,
    #[serde(default)]
    pub description_long: Option<String>,
    #[serde(default)]
    pub description_long_en: Option<String>,
    #[serde(default)]
    pub description_short: Option<String>,
    #[serde(default)]
    pub description_short_en: Option<String>,
    #[serde(default)]
    pub description_small: Option<String>,
    #[serde(default)]
    pub description_small_en: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn default_category() -> String {
    "Miscellaneous".to_string()
}

impl Publisher {
    pub fn has_rss(&self) -> bool {
        !self.rss.is_empty()
    }

    pub fn has_mastodon(&self) -> bool {
        self.mastodon.as_deref().is_some_and(|m| !m.is_empty())
            && self.mastodon_rss.as_deref().is_some_and(|m| !m.is_empty())
    }

    /// English variant when present, otherwise the Romanian one.
    fn localized<'a>(en: &'a Option<String>, ro: &'a Option<String>) -> Option<&'a str> {
        en.as_deref().or(ro.as_deref()).filter(|s| !s.is_empty())
    }

    pub fn description_long(&self) -> Option<&str> {
        Self::localized(&self.description_long_en, &self.description_long)
    }

    pub fn description_short(&self) -> Option<&str> {
        Self::localized(&self.description_short_en, &self.description_short)
    }

    pub fn description_small(&self) -> Option<&str> {
        Self::localized(&self.description_small_en, &self.description_small)
    }

    /// Longest available description, any language.
    pub fn description_any(&self) -> Option<&str> {
        self.description_long()
            .or_else(|| self.description_short())
            .or_else(|| self.description_small())
    }
}
