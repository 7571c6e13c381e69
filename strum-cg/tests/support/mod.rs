//! Shared test support: in-memory database and stub collaborators
#![allow(dead_code)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use strum_cg::models::{
    AccompanimentText, ChartLine, ChordChart, FretboardDiagram, Measure, TrackDetails,
};
use strum_cg::services::{AdminGate, GenerationOrchestrator};
use strum_cg::types::{
    AccompanimentGenerator, ChartGenerator, FretboardGenerator, GeneratorError, IdentityError,
    IdentityResolver, MetadataError, TrackMetadataSource,
};

pub const ADMIN_TOKEN: &str = "admin-session-token";
pub const USER_TOKEN: &str = "user-session-token";
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// In-memory pool with the service schema applied
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    strum_cg::db::init_tables(&pool).await.unwrap();
    pool
}

/// Chart with one line per measure-cell string
pub fn chart_with_measures(cells: &[&str], raw_unique: &[&str]) -> ChordChart {
    ChordChart {
        lines: cells
            .iter()
            .map(|chords| ChartLine {
                lyrics: "sample lyric".to_string(),
                start_time: 0.0,
                measures: vec![Measure {
                    chords: chords.to_string(),
                    start_time: 0.0,
                }],
            })
            .collect(),
        unique_chords: raw_unique.iter().map(|c| c.to_string()).collect(),
    }
}

pub fn sample_chart() -> ChordChart {
    chart_with_measures(&["C", "G Am", "F"], &["C", "G", "Am", "F"])
}

pub fn sample_track(uri: &str, name: &str, artists: &[&str]) -> TrackDetails {
    TrackDetails {
        uri: uri.to_string(),
        name: name.to_string(),
        artists: artists.iter().map(|a| a.to_string()).collect(),
        album: "Test Album".to_string(),
        art: "https://example.com/art.jpg".to_string(),
        preview_url: None,
    }
}

/// Chart generator stub: counts invocations, optionally fails
pub struct StubChartGenerator {
    pub chart: ChordChart,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl StubChartGenerator {
    pub fn returning(chart: ChordChart) -> Arc<Self> {
        Arc::new(Self {
            chart,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            chart: sample_chart(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChartGenerator for StubChartGenerator {
    async fn generate_chart(
        &self,
        _song_name: &str,
        _artist_name: &str,
        _arrangement_style: &str,
    ) -> Result<ChordChart, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GeneratorError::Api(500, "model unavailable".to_string()));
        }
        Ok(self.chart.clone())
    }
}

/// Fretboard generator stub
pub struct StubFretboardGenerator {
    pub diagram: FretboardDiagram,
    pub calls: AtomicUsize,
}

impl StubFretboardGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            diagram: FretboardDiagram {
                frets: [-1, 0, 2, 2, 1, 0],
                fingers: [0, 0, 2, 3, 1, 0],
            },
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FretboardGenerator for StubFretboardGenerator {
    async fn generate_fretboard(&self, _chord: &str) -> Result<FretboardDiagram, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.diagram.clone())
    }
}

/// Accompaniment generator stub
pub struct StubAccompanimentGenerator {
    pub text: AccompanimentText,
    pub calls: AtomicUsize,
}

impl StubAccompanimentGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            text: AccompanimentText {
                playing_style_suggestion: "Gentle and steady".to_string(),
                strumming_pattern: "D DU UDU".to_string(),
                advanced_techniques: None,
            },
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccompanimentGenerator for StubAccompanimentGenerator {
    async fn generate_accompaniment(
        &self,
        _song_name: &str,
        _artist_name: &str,
        _progression: &str,
        _arrangement_style: &str,
    ) -> Result<AccompanimentText, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

/// Track metadata stub: fixed catalog plus URIs that fail to resolve
pub struct StubMetadata {
    pub tracks: HashMap<String, TrackDetails>,
    pub failing: HashSet<String>,
}

impl StubMetadata {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            tracks: HashMap::new(),
            failing: HashSet::new(),
        })
    }

    pub fn with_tracks(tracks: Vec<TrackDetails>) -> Arc<Self> {
        Arc::new(Self {
            tracks: tracks.into_iter().map(|t| (t.uri.clone(), t)).collect(),
            failing: HashSet::new(),
        })
    }

    pub fn with_tracks_and_failures(tracks: Vec<TrackDetails>, failing: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            tracks: tracks.into_iter().map(|t| (t.uri.clone(), t)).collect(),
            failing: failing.iter().map(|u| u.to_string()).collect(),
        })
    }
}

#[async_trait]
impl TrackMetadataSource for StubMetadata {
    async fn resolve_track(&self, uri: &str) -> Result<Option<TrackDetails>, MetadataError> {
        if self.failing.contains(uri) {
            return Err(MetadataError::Network("connection refused".to_string()));
        }
        Ok(self.tracks.get(uri).cloned())
    }

    async fn search_tracks(&self, query: &str) -> Result<Vec<TrackDetails>, MetadataError> {
        let needle = query.to_lowercase();
        let mut matches: Vec<TrackDetails> = self
            .tracks
            .values()
            .filter(|t| t.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.uri.cmp(&b.uri));
        Ok(matches)
    }
}

/// Identity resolver stub: ADMIN_TOKEN resolves to the admin email,
/// USER_TOKEN to an ordinary user, anything else to nobody
pub struct StubResolver;

#[async_trait]
impl IdentityResolver for StubResolver {
    async fn resolve_email(&self, token: &str) -> Result<Option<String>, IdentityError> {
        match token {
            ADMIN_TOKEN => Ok(Some(ADMIN_EMAIL.to_string())),
            USER_TOKEN => Ok(Some("user@example.com".to_string())),
            _ => Ok(None),
        }
    }
}

pub fn admin_gate() -> AdminGate {
    AdminGate::new(Arc::new(StubResolver), vec![ADMIN_EMAIL.to_string()])
}

/// Orchestrator wired to stubs, with handles kept for inspection
pub struct Harness {
    pub pool: SqlitePool,
    pub chart_generator: Arc<StubChartGenerator>,
    pub fretboard_generator: Arc<StubFretboardGenerator>,
    pub accompaniment_generator: Arc<StubAccompanimentGenerator>,
    pub metadata: Arc<StubMetadata>,
    pub orchestrator: GenerationOrchestrator,
}

impl Harness {
    pub async fn new(chart_generator: Arc<StubChartGenerator>, metadata: Arc<StubMetadata>) -> Self {
        let pool = test_pool().await;
        let fretboard_generator = StubFretboardGenerator::new();
        let accompaniment_generator = StubAccompanimentGenerator::new();
        let orchestrator = GenerationOrchestrator::new(
            pool.clone(),
            chart_generator.clone(),
            fretboard_generator.clone(),
            accompaniment_generator.clone(),
            metadata.clone(),
            admin_gate(),
        );
        Self {
            pool,
            chart_generator,
            fretboard_generator,
            accompaniment_generator,
            metadata,
            orchestrator,
        }
    }
}
