//! User media preferences mirrored onto document classes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaFeature {
    HighContrast,
    ReducedMotion,
}

impl MediaFeature {
    /// The media query the host evaluates.
    pub fn query(&self) -> &'static str {
        match self {
            MediaFeature::HighContrast => "(prefers-contrast: high)",
            MediaFeature::ReducedMotion => "(prefers-reduced-motion: reduce)",
        }
    }

    /// Document class set while the query matches.
    pub fn class(&self) -> &'static str {
        match self {
            MediaFeature::HighContrast => "high-contrast",
            MediaFeature::ReducedMotion => "reduced-motion",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPreferences {
    #[serde(default)]
    pub high_contrast: bool,
    #[serde(default)]
    pub reduced_motion: bool,
}

impl MediaPreferences {
    pub fn get(&self, feature: MediaFeature) -> bool {
        match feature {
            MediaFeature::HighContrast => self.high_contrast,
            MediaFeature::ReducedMotion => self.reduced_motion,
        }
    }

    /// Returns true when the value changed.
    pub fn set(&mut self, feature: MediaFeature, matches: bool) -> bool {
        let slot = match feature {
            MediaFeature::HighContrast => &mut self.high_contrast,
            MediaFeature::ReducedMotion => &mut self.reduced_motion,
        };
        let changed = *slot != matches;
        *slot = matches;
        changed
    }

    pub fn document_classes(&self) -> Vec<&'static str> {
        [MediaFeature::HighContrast, MediaFeature::ReducedMotion]
            .into_iter()
            .filter(|f| self.get(*f))
            .map(|f| f.class())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_reports_change() {
        let mut prefs = MediaPreferences::default();
        assert!(prefs.set(MediaFeature::ReducedMotion, true));
        assert!(!prefs.set(MediaFeature::ReducedMotion, true));
        assert_eq!(prefs.document_classes(), vec!["reduced-motion"]);
        assert!(prefs.set(MediaFeature::ReducedMotion, false));
        assert!(prefs.document_classes().is_empty());
    }
}
