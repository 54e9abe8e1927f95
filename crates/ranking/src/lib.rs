//! # Coscientist Ranking
//!
//! Elo tournament ranking for hypothesis populations: the rating math, the
//! deterministic pairing policy, and the [`Tournament`] runner that judges
//! pairs into a local buffer and commits all outcomes at once.

mod elo;
mod error;
mod pairing;
mod standings;
mod tournament;

pub use elo::{expected_score, updated_ratings};
pub use error::{RankingError, Result};
pub use pairing::{pair_up, ROUND_ROBIN_LIMIT};
pub use standings::{ranked, Standings, StandingsEntry};
pub use tournament::{Tournament, TournamentRun};
