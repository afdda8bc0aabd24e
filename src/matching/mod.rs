pub mod discover;
pub mod score;
