//! Usage gate for anonymous visitors.
//!
//! Guests may send a fixed number of messages per conversation before they
//! are asked to log in. Signed-in users are never gated.

pub const DEFAULT_GUEST_MESSAGE_LIMIT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// `remaining` counts the guest messages left after this one; `None` for
    /// signed-in users.
    Allowed { remaining: Option<u32> },
    LoginRequired,
}

#[derive(Debug, Clone, Copy)]
pub struct GuestGate {
    limit: u32,
}

impl Default for GuestGate {
    fn default() -> Self {
        Self::new(DEFAULT_GUEST_MESSAGE_LIMIT)
    }
}

impl GuestGate {
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Decide whether a new message may be sent, given how many user messages
    /// the conversation already holds.
    pub fn check(&self, signed_in: bool, sent: usize) -> GateDecision {
        if signed_in {
            return GateDecision::Allowed { remaining: None };
        }
        let sent = u32::try_from(sent).unwrap_or(u32::MAX);
        if sent >= self.limit {
            GateDecision::LoginRequired
        } else {
            GateDecision::Allowed {
                remaining: Some(self.limit - sent - 1),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_gets_three_messages() {
        let gate = GuestGate::default();
        assert_eq!(gate.check(false, 0), GateDecision::Allowed { remaining: Some(2) });
        assert_eq!(gate.check(false, 1), GateDecision::Allowed { remaining: Some(1) });
        assert_eq!(gate.check(false, 2), GateDecision::Allowed { remaining: Some(0) });
        assert_eq!(gate.check(false, 3), GateDecision::LoginRequired);
        assert_eq!(gate.check(false, 10), GateDecision::LoginRequired);
    }

    #[test]
    fn test_signed_in_users_are_not_gated() {
        let gate = GuestGate::default();
        assert_eq!(gate.check(true, 0), GateDecision::Allowed { remaining: None });
        assert_eq!(gate.check(true, 50), GateDecision::Allowed { remaining: None });
    }

    #[test]
    fn test_zero_limit_blocks_guests() {
        assert_eq!(GuestGate::new(0).check(false, 0), GateDecision::LoginRequired);
    }
}
