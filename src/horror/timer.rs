//! Expiring effect slots
//!
//! Each timed effect owns one slot holding its value, a deadline on the
//! monotonic game clock and an identity token. Clearing always goes through
//! the token or the deadline, so a late check can never wipe out an effect
//! that replaced the one it was meant for.

#[derive(Debug, Clone, Copy, PartialEq)]
struct Armed<T> {
    value: T,
    token: u64,
    expires_at: f64,
}

/// A single timed effect
#[derive(Debug, Clone)]
pub struct EffectTimer<T> {
    slot: Option<Armed<T>>,
    next_token: u64,
}

impl<T> Default for EffectTimer<T> {
    fn default() -> Self {
        Self {
            slot: None,
            next_token: 1,
        }
    }
}

impl<T: Copy> EffectTimer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `value` until `now + duration_ms`, replacing whatever was
    /// armed. Returns the new identity token.
    pub fn arm(&mut self, value: T, now: f64, duration_ms: f64) -> u64 {
        let token = self.next_token;
        self.next_token += 1;
        self.slot = Some(Armed {
            value,
            token,
            expires_at: now + duration_ms.max(0.0),
        });
        token
    }

    pub fn active(&self) -> Option<T> {
        self.slot.map(|a| a.value)
    }

    pub fn is_active(&self) -> bool {
        self.slot.is_some()
    }

    pub fn expires_at(&self) -> Option<f64> {
        self.slot.map(|a| a.expires_at)
    }

    /// Clear the slot only if `token` is still the armed identity
    pub fn release(&mut self, token: u64) -> Option<T> {
        match self.slot {
            Some(armed) if armed.token == token => {
                self.slot = None;
                Some(armed.value)
            }
            _ => None,
        }
    }

    /// Clear the slot if its deadline has passed, returning the ended value
    pub fn expire(&mut self, now: f64) -> Option<T> {
        match self.slot {
            Some(armed) if now >= armed.expires_at => self.release(armed.token),
            _ => None,
        }
    }

    /// Drop the armed effect unconditionally (level start)
    pub fn reset(&mut self) {
        self.slot = None;
    }
}
