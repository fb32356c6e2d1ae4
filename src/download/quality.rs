use serde::{Deserialize, Serialize};
use std::fmt;

/// Audio quality tiers understood by the TIDAL streaming API.
///
/// The serialized names are the wire values used by the API and by the
/// tidal-dl-ng download helper.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AudioQuality {
    #[serde(rename = "LOW")]
    Low96k,
    #[serde(rename = "HIGH")]
    Low320k,
    #[serde(rename = "LOSSLESS")]
    HighLossless,
    #[serde(rename = "HI_RES_LOSSLESS")]
    HiResLossless,
}

/// Label used when a caller does not pass a quality.
pub const DEFAULT_QUALITY_LABEL: &str = "HiFi";

/// User-facing quality labels, in declaration order. Several labels alias the
/// same tier.
const QUALITY_TABLE: &[(&str, AudioQuality)] = &[
    ("Low", AudioQuality::Low320k),
    ("High", AudioQuality::HighLossless),
    ("HiFi", AudioQuality::HighLossless),
    ("Lossless", AudioQuality::HighLossless),
    ("HiRes", AudioQuality::HiResLossless),
    ("Master", AudioQuality::HiResLossless),
];

const FALLBACK_QUALITY: AudioQuality = AudioQuality::HighLossless;

/// Map a user-facing quality label to an audio quality tier.
///
/// Matching is exact. Unknown labels, including the empty string, resolve to
/// [`AudioQuality::HighLossless`] instead of failing.
pub fn resolve(label: &str) -> AudioQuality {
    QUALITY_TABLE
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, quality)| *quality)
        .unwrap_or(FALLBACK_QUALITY)
}

/// Whether `label` is one of the declared quality labels
pub fn is_known_label(label: &str) -> bool {
    QUALITY_TABLE.iter().any(|(name, _)| *name == label)
}

/// All declared quality labels in table order
pub fn labels() -> impl Iterator<Item = &'static str> {
    QUALITY_TABLE.iter().map(|(name, _)| *name)
}

impl AudioQuality {
    /// Wire name used by the TIDAL API
    pub fn as_api_str(&self) -> &'static str {
        match self {
            AudioQuality::Low96k => "LOW",
            AudioQuality::Low320k => "HIGH",
            AudioQuality::HighLossless => "LOSSLESS",
            AudioQuality::HiResLossless => "HI_RES_LOSSLESS",
        }
    }

    /// Parse an API quality string. `HI_RES` (MQA era) maps to the hi-res tier.
    pub fn from_api_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(AudioQuality::Low96k),
            "HIGH" => Some(AudioQuality::Low320k),
            "LOSSLESS" => Some(AudioQuality::HighLossless),
            "HI_RES" | "HI_RES_LOSSLESS" => Some(AudioQuality::HiResLossless),
            _ => None,
        }
    }

    /// Human readable description including codec and resolution
    pub fn description(&self) -> &'static str {
        match self {
            AudioQuality::Low96k => "Low (96 kbps AAC)",
            AudioQuality::Low320k => "Low (320 kbps AAC)",
            AudioQuality::HighLossless => "HiFi / Lossless (FLAC 16-bit/44.1kHz)",
            AudioQuality::HiResLossless => "HiRes / Master (FLAC up to 24-bit/192kHz)",
        }
    }
}

impl fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_api_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_labels_resolve() {
        assert_eq!(resolve("Low"), AudioQuality::Low320k);
        assert_eq!(resolve("High"), AudioQuality::HighLossless);
        assert_eq!(resolve("HiFi"), AudioQuality::HighLossless);
        assert_eq!(resolve("Lossless"), AudioQuality::HighLossless);
        assert_eq!(resolve("HiRes"), AudioQuality::HiResLossless);
        assert_eq!(resolve("Master"), AudioQuality::HiResLossless);
    }

    #[test]
    fn test_unknown_labels_fall_back_to_lossless() {
        for label in ["bogus", "", "hifi", "MASTER", " HiRes"] {
            assert_eq!(resolve(label), AudioQuality::HighLossless, "label {label:?}");
        }
    }

    #[test]
    fn test_label_table() {
        assert_eq!(labels().count(), 6);
        assert!(is_known_label(DEFAULT_QUALITY_LABEL));
        assert!(!is_known_label("Ultra"));
    }

    #[test]
    fn test_api_names() {
        assert_eq!(AudioQuality::from_api_str("hi_res"), Some(AudioQuality::HiResLossless));
        assert_eq!(AudioQuality::from_api_str("LOSSLESS"), Some(AudioQuality::HighLossless));
        assert_eq!(AudioQuality::from_api_str("DOLBY_ATMOS"), None);
        assert_eq!(AudioQuality::Low320k.to_string(), "HIGH");

        let json = serde_json::to_string(&AudioQuality::HiResLossless).unwrap();
        assert_eq!(json, "\"HI_RES_LOSSLESS\"");
    }
}
