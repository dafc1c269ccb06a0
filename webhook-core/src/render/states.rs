//! Closed state tables for review and participant state changes.
//!
//! Codes outside a table are rejected, never mapped to a default label.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Open,
    Closed,
}

impl ReviewState {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ReviewState::Open),
            1 => Some(ReviewState::Closed),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReviewState::Open => "`Open`",
            ReviewState::Closed => "`Closed`",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantState {
    Unread,
    Read,
    Accepted,
    Rejected,
}

impl ParticipantState {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ParticipantState::Unread),
            1 => Some(ParticipantState::Read),
            2 => Some(ParticipantState::Accepted),
            3 => Some(ParticipantState::Rejected),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParticipantState::Unread => "`Unread`",
            ParticipantState::Read => "`Read`",
            ParticipantState::Accepted => "`Accepted`",
            ParticipantState::Rejected => "`Rejected`",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_closed() {
        assert_eq!(ReviewState::from_code(1), Some(ReviewState::Closed));
        assert_eq!(ReviewState::from_code(2), None);
        assert_eq!(ReviewState::from_code(-1), None);
        assert_eq!(ParticipantState::from_code(3), Some(ParticipantState::Rejected));
        assert_eq!(ParticipantState::from_code(4), None);
    }
}
