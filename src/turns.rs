// src/turns.rs

use crate::constants::TOTAL_MAX_TURNS;
use crate::message::PlayerIdentity;
use serde::{Deserialize, Serialize};

/// Per-player and total turn bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub player_a_turns: u32,
    pub player_b_turns: u32,
    // Total at which the last image was successfully produced. Only the interval trigger reads it.
    pub last_image_at_total_turn: u32,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    // Counts one accepted submission and returns the new total.
    pub fn record_turn(&mut self, player: PlayerIdentity) -> u32 {
        match player {
            PlayerIdentity::A => self.player_a_turns += 1,
            PlayerIdentity::B => self.player_b_turns += 1,
        }
        self.total()
    }

    pub fn total(&self) -> u32 {
        self.player_a_turns + self.player_b_turns
    }

    pub fn turns_for(&self, player: PlayerIdentity) -> u32 {
        match player {
            PlayerIdentity::A => self.player_a_turns,
            PlayerIdentity::B => self.player_b_turns,
        }
    }

    pub fn remaining(&self) -> u32 {
        TOTAL_MAX_TURNS.saturating_sub(self.total())
    }

    pub fn is_game_over(&self) -> bool {
        is_final_turn(self.total())
    }

    pub fn mark_image_generated(&mut self, total: u32) {
        self.last_image_at_total_turn = total;
    }
}

pub fn is_final_turn(total: u32) -> bool {
    total >= TOTAL_MAX_TURNS
}
