mod game_service;

pub use game_service::{CheckOutcome, GameError, GameRound, GameService};
