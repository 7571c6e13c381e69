//! Google generative-language API client
//!
//! One client implements all three generator seams. Requests run in JSON
//! mode so the model answers with a single JSON document, which is parsed
//! straight into the typed payload; anything else is a parse failure, never
//! a partially usable artifact.

use crate::models::{AccompanimentText, ChordChart, FretboardDiagram};
use crate::types::{
    AccompanimentGenerator, ChartGenerator, FretboardGenerator, GeneratorError,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

// Chart generation walks a whole song line by line; allow the model time
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Generative-language API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, GeneratorError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| GeneratorError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Override the model id (e.g. for a larger model in production)
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Run one JSON-mode generation and parse the answer into `T`
    async fn generate_json<T: DeserializeOwned>(&self, prompt: String) -> Result<T, GeneratorError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            GEMINI_API_BASE_URL, self.model, self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GeneratorError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Api(status.as_u16(), error_text));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::Parse(e.to_string()))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                GeneratorError::InvalidResult("model returned no candidates".to_string())
            })?;

        serde_json::from_str(text.trim()).map_err(|e| GeneratorError::Parse(e.to_string()))
    }
}

fn chart_prompt(song_name: &str, artist_name: &str, arrangement_style: &str) -> String {
    format!(
        r#"You are a musical expert. Generate the chord progression for "{song_name}" by "{artist_name}" with real lyrics, measures, and precise timestamps.

Arrangement style: {arrangement_style}. If the style is "Pop Arrangement", make the arrangement more intricate: slash chords (e.g. G/B) for basslines, 7ths, 9ths and other extensions are welcome.

For each line of the song provide:
1. "lyrics": the real lyrics of that line.
2. "startTime": the start time of the line in seconds, as a number.
3. "measures": the chords of that line broken into measures, each measure an object with "chords" (e.g. "C" or "G Am") and its own "startTime" in seconds.

Cover the entire song structure; do not leave lines out. Also provide "uniqueChords": every unique chord name used, in standard notation.

Respond with a single JSON object of the form:
{{"lines": [{{"lyrics": "...", "startTime": 15.5, "measures": [{{"chords": "C", "startTime": 15.5}}]}}], "uniqueChords": ["C"]}}"#
    )
}

fn fretboard_prompt(chord: &str) -> String {
    format!(
        r#"You are an expert guitarist. Give the standard fingering for the guitar chord "{chord}".

Provide "frets": six numbers for strings E A D G B e, where -1 is muted and 0 is open, and "fingers": six numbers where 0 is open/unfretted and 1-4 are index through pinky. For a slash chord like "C/G" the lowest played string must sound the bass note. Use the simplest common voicing.

Examples:
- "Am": frets [-1, 0, 2, 2, 1, 0], fingers [0, 0, 2, 3, 1, 0]
- "F": frets [1, 3, 3, 2, 1, 1], fingers [1, 3, 4, 2, 1, 1]
- "G7": frets [3, 2, 0, 0, 0, 1], fingers [3, 2, 0, 0, 0, 1]
- "C/G": frets [3, 3, 2, 0, 1, 0], fingers [3, 4, 2, 0, 1, 0]

Respond with a single JSON object: {{"frets": [...], "fingers": [...]}}"#
    )
}

fn accompaniment_prompt(
    song_name: &str,
    artist_name: &str,
    progression: &str,
    arrangement_style: &str,
) -> String {
    format!(
        r#"You are an expert guitar instructor. The song "{song_name}" by "{artist_name}" has this chord progression:

{progression}

Give practical accompaniment advice for the arrangement style "{arrangement_style}":
1. "playingStyleSuggestion": the overall feel and dynamics (e.g. start soft in the verses, build to the chorus).
2. "strummingPattern": a versatile pattern in "D DU UDU" form (D=down, U=up).
3. "advancedTechniques" (optional): embellishments such as palm muting, hammer-ons or a fingerpicking pattern for specific sections.

Be concise and encouraging. Respond with a single JSON object with those keys."#
    )
}

#[async_trait]
impl ChartGenerator for GeminiClient {
    async fn generate_chart(
        &self,
        song_name: &str,
        artist_name: &str,
        arrangement_style: &str,
    ) -> Result<ChordChart, GeneratorError> {
        tracing::info!(song = %song_name, artist = %artist_name, style = %arrangement_style, "Generating chord chart");
        self.generate_json(chart_prompt(song_name, artist_name, arrangement_style))
            .await
    }
}

#[async_trait]
impl FretboardGenerator for GeminiClient {
    async fn generate_fretboard(&self, chord: &str) -> Result<FretboardDiagram, GeneratorError> {
        tracing::info!(chord = %chord, "Generating fretboard diagram");
        self.generate_json(fretboard_prompt(chord)).await
    }
}

#[async_trait]
impl AccompanimentGenerator for GeminiClient {
    async fn generate_accompaniment(
        &self,
        song_name: &str,
        artist_name: &str,
        progression: &str,
        arrangement_style: &str,
    ) -> Result<AccompanimentText, GeneratorError> {
        tracing::info!(song = %song_name, style = %arrangement_style, "Generating accompaniment advice");
        self.generate_json(accompaniment_prompt(
            song_name,
            artist_name,
            progression,
            arrangement_style,
        ))
        .await
    }
}
