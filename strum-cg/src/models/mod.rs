//! Data models for the chart generator service

pub mod accompaniment;
pub mod chart;
pub mod fretboard;
pub mod track;

pub use accompaniment::AccompanimentText;
pub use chart::{ChartLine, ChordChart, Measure};
pub use fretboard::FretboardDiagram;
pub use track::{TrackDetails, TrackSummary};
