//! Service layer: external API clients, the admin gate, and the
//! get-or-generate orchestrator

pub mod admin_gate;
pub mod gemini_client;
pub mod orchestrator;
pub mod session_resolver;
pub mod spotify_client;
pub mod youtube_client;

pub use admin_gate::AdminGate;
pub use gemini_client::GeminiClient;
pub use orchestrator::{GenerationOrchestrator, OrchestratorError};
pub use session_resolver::DbSessionResolver;
pub use spotify_client::SpotifyClient;
pub use youtube_client::YouTubeClient;
