//! Fretboard diagram model

use serde::{Deserialize, Serialize};

/// Fingering for one chord voicing, strings ordered low E to high e
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FretboardDiagram {
    /// Fret per string: -1 muted, 0 open, >0 fret number
    pub frets: [i8; 6],
    /// Finger per string: 0 open/unfretted, 1-4 index through pinky
    pub fingers: [u8; 6],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_preserves_muted_strings() {
        let diagram = FretboardDiagram {
            frets: [-1, 0, 2, 2, 1, 0],
            fingers: [0, 0, 2, 3, 1, 0],
        };

        let json = serde_json::to_string(&diagram).unwrap();
        let parsed: FretboardDiagram = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, diagram);
    }

    #[test]
    fn test_wrong_string_count_is_rejected() {
        let result: Result<FretboardDiagram, _> =
            serde_json::from_str(r#"{"frets":[0,0,0],"fingers":[0,0,0]}"#);
        assert!(result.is_err());
    }
}
