pub mod characters;
pub mod player;
pub mod roster;
pub mod similarity;
pub mod validator;

pub use player::{NoiseFilter, PlayerCandidate, PlayerValidator};
pub use roster::{JsonRoster, PlayerProvider, StaticRoster};
pub use similarity::{IndelRatio, Levenshtein, Similarity, SimilarityMetric};
pub use validator::{validate, Field, TextValidator, ValidationStats, Vocabulary};
