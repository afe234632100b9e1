//! Label normalization.
//!
//! Every label value that reaches the registry goes through one of these
//! functions, so the number of series per family stays bounded no matter
//! what the host sends.

use std::fmt;

/// Value used for any missing or unrecognized label.
pub const UNKNOWN: &str = "unknown";

/// The closed vocabulary of the `play_mode` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayMode {
    Direct,
    Transcode,
    Unknown,
}

impl PlayMode {
    pub const ALL: [PlayMode; 3] = [PlayMode::Direct, PlayMode::Transcode, PlayMode::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayMode::Direct => "direct",
            PlayMode::Transcode => "transcode",
            PlayMode::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalizes a raw item type into a lowercase token.
///
/// Missing, empty and whitespace-only input becomes `"unknown"`. Anything
/// else is trimmed and lowercased, with no restriction on the vocabulary.
pub fn normalize_item_type(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_lowercase(),
        _ => UNKNOWN.to_string(),
    }
}

/// Maps a raw play method onto [`PlayMode`].
///
/// Matching is case-insensitive. `DirectPlay` and `DirectStream` collapse to
/// `direct`; the already-normalized `direct` and `transcode` pass through.
pub fn normalize_play_mode(raw: Option<&str>) -> PlayMode {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return PlayMode::Unknown;
    };

    if s.eq_ignore_ascii_case("transcode") {
        PlayMode::Transcode
    } else if s.eq_ignore_ascii_case("directplay")
        || s.eq_ignore_ascii_case("directstream")
        || s.eq_ignore_ascii_case("direct")
    {
        PlayMode::Direct
    } else {
        PlayMode::Unknown
    }
}

/// True when a non-blank play mode fell through the table.
pub(crate) fn is_unrecognized_play_mode(raw: Option<&str>, mode: PlayMode) -> bool {
    mode == PlayMode::Unknown && raw.is_some_and(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_item_types_are_unknown() {
        for raw in [None, Some(""), Some("   "), Some("\t\n")] {
            assert_eq!(normalize_item_type(raw), "unknown", "input {:?}", raw);
        }
    }

    #[test]
    fn item_type_is_trimmed_and_case_insensitive() {
        assert_eq!(normalize_item_type(Some("Movie")), "movie");
        assert_eq!(normalize_item_type(Some("MOVIE")), "movie");
        assert_eq!(normalize_item_type(Some("  Episode ")), "episode");
        assert_eq!(normalize_item_type(Some("MusicVideo")), "musicvideo");
    }

    #[test]
    fn item_type_normalization_is_idempotent() {
        for raw in ["Movie", " Audio ", "TvChannel", "unknown", "Ünïcode"] {
            let once = normalize_item_type(Some(raw));
            assert_eq!(normalize_item_type(Some(once.as_str())), once);
        }
    }

    #[test]
    fn play_mode_table() {
        let cases = [
            ("Transcode", PlayMode::Transcode),
            ("TRANSCODE", PlayMode::Transcode),
            ("transcode", PlayMode::Transcode),
            ("DirectPlay", PlayMode::Direct),
            ("directplay", PlayMode::Direct),
            ("DirectStream", PlayMode::Direct),
            ("direct", PlayMode::Direct),
            ("Direct", PlayMode::Direct),
            ("garbage-value", PlayMode::Unknown),
            ("Direct Play", PlayMode::Unknown),
            ("unknown", PlayMode::Unknown),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize_play_mode(Some(raw)), expected, "input {:?}", raw);
        }
    }

    #[test]
    fn blank_play_modes_are_unknown() {
        for raw in [None, Some(""), Some("  ")] {
            assert_eq!(normalize_play_mode(raw), PlayMode::Unknown);
        }
    }

    #[test]
    fn play_mode_output_is_closed() {
        let inputs = [None, Some(""), Some("x"), Some("DirectPlay"), Some("Transcode"), Some("🎬")];
        for raw in inputs {
            let mode = normalize_play_mode(raw);
            assert!(PlayMode::ALL.contains(&mode));
            assert!(["direct", "transcode", "unknown"].contains(&mode.as_str()));
        }
    }

    #[test]
    fn unrecognized_only_for_non_blank_input() {
        assert!(is_unrecognized_play_mode(Some("bogus"), PlayMode::Unknown));
        assert!(!is_unrecognized_play_mode(None, PlayMode::Unknown));
        assert!(!is_unrecognized_play_mode(Some(" "), PlayMode::Unknown));
        assert!(!is_unrecognized_play_mode(Some("direct"), PlayMode::Direct));
    }
}
