pub mod game_shares;
pub mod games;
pub mod match_players;
pub mod matches;
pub mod player_shares;
pub mod players;
pub mod scoresheets;
pub mod users;
