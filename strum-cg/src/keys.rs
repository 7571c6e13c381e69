//! Cache key derivation and search token extraction
//!
//! Keys are pure functions of their inputs; identical inputs always address
//! the same cache entry. Every derived key must pass through [`sanitize`]
//! before touching the store, on reads and writes alike.

/// Arrangement style used when a request does not specify one
pub const DEFAULT_ARRANGEMENT_STYLE: &str = "Standard";

/// Prefix of catalog-backed track URIs
pub const CATALOG_URI_PREFIX: &str = "spotify:";

/// Prefix of ad hoc local-upload identifiers
pub const LOCAL_URI_PREFIX: &str = "local:file:";

/// True when the subject is a catalog-backed track (cacheable)
pub fn is_catalog_uri(uri: &str) -> bool {
    uri.starts_with(CATALOG_URI_PREFIX)
}

/// True when the subject is a local upload (never cached; the identifier is
/// not stable across users)
pub fn is_local_uri(uri: &str) -> bool {
    uri.starts_with(LOCAL_URI_PREFIX)
}

/// Normalize an arrangement style, mapping empty to the default sentinel
pub fn effective_style(style: &str) -> &str {
    if style.trim().is_empty() {
        DEFAULT_ARRANGEMENT_STYLE
    } else {
        style
    }
}

/// Derive the chart cache key for a (song, arrangement style) pair
///
/// The default style is folded into the bare URI so that "", unspecified and
/// "Standard" all address the same entry; any other style is suffixed.
pub fn chart_key(song_uri: &str, style: &str) -> String {
    let style = effective_style(style);
    if style == DEFAULT_ARRANGEMENT_STYLE {
        song_uri.to_string()
    } else {
        format!("{song_uri}-{style}")
    }
}

/// Derive the fretboard cache key: the chord name itself
pub fn fretboard_key(chord: &str) -> String {
    chord.to_string()
}

/// Derive the accompaniment cache key from the chart's unique chords
///
/// Chords join in presented order; two charts with the same chords in the
/// same order and the same style share advice.
pub fn accompaniment_key(unique_chords: &[String], style: &str) -> String {
    format!("{}-{}", unique_chords.join("-"), effective_style(style))
}

/// Replace path-separator-like characters so the key is a valid storage id
pub fn sanitize(raw_key: &str) -> String {
    raw_key.replace(['/', ':'], "-")
}

/// Lower-cased search tokens for a track: title plus each artist name
///
/// The library search matches a lower-cased query against this set exactly
/// (membership, not substring).
pub fn search_tokens(title: &str, artists: &[String]) -> Vec<String> {
    let mut tokens = Vec::with_capacity(artists.len() + 1);
    tokens.push(title.to_lowercase());
    for artist in artists {
        let token = artist.to_lowercase();
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// Display name for a local upload: identifier with prefix and extension
/// stripped
pub fn local_display_name(uri: &str) -> String {
    let name = uri.strip_prefix(LOCAL_URI_PREFIX).unwrap_or(uri);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_key_default_style_is_bare_uri() {
        assert_eq!(chart_key("spotify:track:abc", ""), "spotify:track:abc");
        assert_eq!(chart_key("spotify:track:abc", "Standard"), "spotify:track:abc");
    }

    #[test]
    fn test_chart_key_appends_non_default_style() {
        assert_eq!(
            chart_key("spotify:track:abc", "Pop Arrangement"),
            "spotify:track:abc-Pop Arrangement"
        );
    }

    #[test]
    fn test_chart_key_is_idempotent() {
        let first = chart_key("spotify:track:abc", "Pop");
        let second = chart_key("spotify:track:abc", "Pop");
        assert_eq!(first, second);
    }

    #[test]
    fn test_fretboard_key_is_the_chord_name() {
        assert_eq!(fretboard_key("F#m"), "F#m");
        assert_eq!(fretboard_key("C/G"), "C/G");
    }

    #[test]
    fn test_accompaniment_key_joins_chords_in_order() {
        let chords = vec!["C".to_string(), "G7".to_string(), "Am".to_string()];
        assert_eq!(accompaniment_key(&chords, "Pop"), "C-G7-Am-Pop");
        assert_eq!(accompaniment_key(&chords, ""), "C-G7-Am-Standard");
    }

    #[test]
    fn test_sanitize_removes_separators() {
        let sanitized = sanitize("spotify:track:abc/C/G");
        assert!(!sanitized.contains('/'));
        assert!(!sanitized.contains(':'));
        assert_eq!(sanitized, "spotify-track-abc-C-G");
    }

    #[test]
    fn test_search_tokens_lower_cases_and_dedups() {
        let tokens = search_tokens("Let It Be", &["The Beatles".to_string()]);
        assert_eq!(tokens, vec!["let it be", "the beatles"]);

        let self_titled = search_tokens("Weezer", &["Weezer".to_string()]);
        assert_eq!(self_titled, vec!["weezer"]);
    }

    #[test]
    fn test_local_display_name_strips_prefix_and_extension() {
        assert_eq!(local_display_name("local:file:My Song.mp3"), "My Song");
        assert_eq!(local_display_name("local:file:noext"), "noext");
    }

    #[test]
    fn test_uri_kind_predicates() {
        assert!(is_catalog_uri("spotify:track:abc"));
        assert!(!is_catalog_uri("local:file:foo.mp3"));
        assert!(is_local_uri("local:file:foo.mp3"));
        assert!(!is_local_uri("spotify:track:abc"));
    }
}
