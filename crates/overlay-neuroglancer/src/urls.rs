// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Source url conventions: `gs://` normalisation and cache busting.

use regex::{NoExpand, Regex};
use uuid::Uuid;

use crate::settings::{NeuroglancerSettings, SettingsError};

/// Rewrites source urls the way the host expects them.
#[derive(Clone, Debug)]
pub struct UrlRewriter {
    gcs_scheme: Regex,
    gcs_https_base: String,
    cache_bust: Regex,
    cache_bust_param: String,
}

impl UrlRewriter {
    /// Builds a rewriter from `settings`.
    pub fn new(settings: &NeuroglancerSettings) -> Result<Self, SettingsError> {
        let param = settings.cache_bust_param.as_str();
        if param.is_empty() {
            return Err(SettingsError::EmptyCacheBustParam);
        }
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|source| SettingsError::CacheBustPattern {
                param: param.to_owned(),
                source,
            })
        };
        Ok(Self {
            gcs_scheme: compile(r"\bgs://")?,
            gcs_https_base: settings.gcs_https_base.clone(),
            cache_bust: compile(&format!(r"\b{}=[^/?&#]+", regex::escape(param)))?,
            cache_bust_param: param.to_owned(),
        })
    }

    /// Replaces the first `gs://` scheme with the https Cloud Storage
    /// equivalent.
    ///
    /// A nested scheme (`precomputed://gs://...`) is rewritten in place; a
    /// later `gs://` (e.g. inside a path) is left alone.
    pub fn normalize_source(&self, url: &str) -> String {
        self.gcs_scheme
            .replace(url, NoExpand(&self.gcs_https_base))
            .into_owned()
    }

    /// Replaces the cache-bust token with a fresh random one.
    ///
    /// Urls without the parameter come back unchanged.
    pub fn cache_bust(&self, url: &str) -> String {
        let token = format!("{}={}", self.cache_bust_param, Uuid::new_v4());
        self.cache_bust.replace(url, NoExpand(&token)).into_owned()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rewriter() -> UrlRewriter {
        UrlRewriter::new(&NeuroglancerSettings::default()).unwrap()
    }

    #[test]
    fn gs_scheme_maps_to_storage_https() {
        assert_eq!(
            rewriter().normalize_source("gs://bucket/path"),
            "https://storage.googleapis.com/bucket/path"
        );
        assert_eq!(
            rewriter().normalize_source("precomputed://gs://bucket/path"),
            "precomputed://https://storage.googleapis.com/bucket/path"
        );
    }

    #[test]
    fn only_the_first_gs_scheme_is_rewritten() {
        assert_eq!(
            rewriter().normalize_source("gs://bucket/mirror/gs://other"),
            "https://storage.googleapis.com/bucket/mirror/gs://other"
        );
    }

    #[test]
    fn non_gs_sources_are_untouched() {
        let url = "precomputed://https://example.org/bugs://x";
        assert_eq!(rewriter().normalize_source(url), url);
    }

    #[test]
    fn cache_bust_replaces_only_the_token() {
        let url = "precomputed://https://host/predictions/run_id=abc/data?x=1";
        let busted = rewriter().cache_bust(url);
        assert!(busted.starts_with("precomputed://https://host/predictions/run_id="));
        assert!(busted.ends_with("/data?x=1"));
        assert!(!busted.contains("run_id=abc"));
    }

    #[test]
    fn cache_bust_stops_at_query_separator() {
        let busted = rewriter().cache_bust("https://host/p?run_id=abc&page=2");
        assert!(busted.ends_with("&page=2"));
        assert!(!busted.contains("abc"));
    }

    #[test]
    fn cache_bust_yields_fresh_tokens() {
        let url = "precomputed://https://host/run_id=abc/data";
        assert_ne!(rewriter().cache_bust(url), rewriter().cache_bust(url));
    }

    #[test]
    fn url_without_token_is_unchanged() {
        let url = "precomputed://https://host/data";
        assert_eq!(rewriter().cache_bust(url), url);
    }

    #[test]
    fn empty_param_is_rejected() {
        let settings = NeuroglancerSettings {
            cache_bust_param: String::new(),
            ..NeuroglancerSettings::default()
        };
        assert!(matches!(
            UrlRewriter::new(&settings),
            Err(SettingsError::EmptyCacheBustParam)
        ));
    }
}
