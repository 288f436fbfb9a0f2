//! Transient hit/miss feedback for the presentation layer
//!
//! Entries expire on their own, and all of them go when play stops, since no frames
//! arrive to prune them while paused or after game over. Nothing here feeds back into
//! the run.

use crate::sim::{GameEvent, GamePhase};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedbackKind {
    Hit { score_gain: u64, perfect: bool },
    Miss,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    pub id: u32,
    pub lane: u8,
    pub kind: FeedbackKind,
    pub expires_at_ms: f64,
}

impl Feedback {
    pub fn label(&self) -> String {
        match self.kind {
            FeedbackKind::Hit {
                score_gain,
                perfect: true,
            } => format!("Perfect! +{}", score_gain),
            FeedbackKind::Hit { score_gain, .. } => format!("+{}", score_gain),
            FeedbackKind::Miss => "Miss".to_string(),
        }
    }
}

/// Currently visible feedback entries
#[derive(Debug, Clone)]
pub struct FeedbackBoard {
    duration_ms: f64,
    entries: Vec<Feedback>,
    next_id: u32,
}

impl FeedbackBoard {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Turn a game event into a feedback entry. Returns false for events with no
    /// visual feedback.
    ///
    /// Leaving `Playing` clears the board.
    pub fn push_event(&mut self, event: &GameEvent, now_ms: f64) -> bool {
        let (lane, kind) = match *event {
            GameEvent::PhaseChanged { to, .. } if to != GamePhase::Playing => {
                self.clear();
                return false;
            }
            GameEvent::Hit {
                lane,
                score_gain,
                perfect,
            } => (lane, FeedbackKind::Hit { score_gain, perfect }),
            GameEvent::Miss { lane } => (lane, FeedbackKind::Miss),
            _ => return false,
        };

        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Feedback {
            id,
            lane,
            kind,
            expires_at_ms: now_ms + self.duration_ms,
        });
        true
    }

    /// Drop expired entries
    pub fn prune(&mut self, now_ms: f64) {
        self.entries.retain(|f| f.expires_at_ms > now_ms);
    }

    pub fn entries(&self) -> &[Feedback] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_expire() {
        let mut board = FeedbackBoard::new(500.0);
        board.push_event(&GameEvent::Miss { lane: 1 }, 0.0);
        board.push_event(
            &GameEvent::Hit {
                lane: 2,
                score_gain: 16,
                perfect: true,
            },
            200.0,
        );
        board.prune(499.0);
        assert_eq!(board.entries().len(), 2);
        board.prune(500.0);
        assert_eq!(board.entries().len(), 1);
        assert_eq!(board.entries()[0].label(), "Perfect! +16");
        board.prune(700.0);
        assert!(board.entries().is_empty());
    }

    #[test]
    fn test_ids_increase() {
        let mut board = FeedbackBoard::new(100.0);
        board.push_event(&GameEvent::Miss { lane: 0 }, 0.0);
        board.push_event(&GameEvent::Miss { lane: 0 }, 0.0);
        assert_eq!(board.entries()[0].id, 1);
        assert_eq!(board.entries()[1].id, 2);
    }

    #[test]
    fn test_leaving_play_clears_board() {
        let mut board = FeedbackBoard::new(500.0);
        board.push_event(&GameEvent::Miss { lane: 3 }, 0.0);
        board.push_event(
            &GameEvent::PhaseChanged {
                from: GamePhase::Playing,
                to: GamePhase::GameOver,
            },
            10.0,
        );
        assert!(board.entries().is_empty());

        // Resuming keeps whatever is already showing
        board.push_event(&GameEvent::Miss { lane: 1 }, 20.0);
        board.push_event(
            &GameEvent::PhaseChanged {
                from: GamePhase::Paused,
                to: GamePhase::Playing,
            },
            30.0,
        );
        assert_eq!(board.entries().len(), 1);
    }

    #[test]
    fn test_ignores_other_events() {
        let mut board = FeedbackBoard::new(100.0);
        assert!(!board.push_event(&GameEvent::TileSpawned { id: 1, lane: 0 }, 0.0));
        assert!(board.entries().is_empty());
    }
}
