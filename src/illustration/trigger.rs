// src/illustration/trigger.rs

use crate::constants::IMAGE_GENERATION_INTERVAL;

/// Inputs of the "illustrate now?" decision, evaluated once per narrative segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTrigger {
    pub enabled: bool,
    // Total player turns after the current submission.
    pub current_total: u32,
    pub last_image_at_total_turn: u32,
    pub tag_present: bool,
    pub is_final_turn: bool,
}

impl ImageTrigger {
    pub fn is_first_ever_turn(&self) -> bool {
        self.current_total == 1
    }

    pub fn is_interval_due(&self) -> bool {
        self.current_total > 0
            && self
                .current_total
                .saturating_sub(self.last_image_at_total_turn)
                >= IMAGE_GENERATION_INTERVAL
    }

    // The concluding turn is never illustrated.
    pub fn should_generate(&self) -> bool {
        self.enabled
            && (self.is_first_ever_turn() || self.tag_present || self.is_interval_due())
            && !self.is_final_turn
    }
}
