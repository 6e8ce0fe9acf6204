//! Honeypot and arithmetic challenge checks that stand in for a hosted
//! CAPTCHA service.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;

/// Both operands are drawn independently from this range.
pub const OPERAND_RANGE: RangeInclusive<u8> = 1..=9;

/// The current arithmetic prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChallengeState {
    first: u8,
    second: u8,
    generation: u64,
}

impl ChallengeState {
    pub fn first(&self) -> u8 {
        self.first
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn answer(&self) -> i64 {
        i64::from(self.first) + i64::from(self.second)
    }

    /// Incremented on every draw, so a redraw is observable even when the
    /// operands repeat.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn prompt(&self) -> String {
        format!("What is {} + {}?", self.first, self.second)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChallengeError {
    #[error("Please answer the security check")]
    Missing,
    #[error("Please enter a valid number")]
    NotANumber,
    #[error("Incorrect answer to the math problem. Please try again.")]
    Incorrect,
}

/// Signal that the honeypot caught something. Never shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("honeypot field was populated")]
pub struct SpamSuppressed;

pub struct AntiSpamGuard {
    rng: StdRng,
    challenge: ChallengeState,
}

impl AntiSpamGuard {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic guard for tests and scripted sessions.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(mut rng: StdRng) -> Self {
        let challenge = ChallengeState {
            first: rng.gen_range(OPERAND_RANGE),
            second: rng.gen_range(OPERAND_RANGE),
            generation: 1,
        };
        Self { rng, challenge }
    }

    pub fn challenge(&self) -> &ChallengeState {
        &self.challenge
    }

    /// Redraws both operands together.
    pub fn new_challenge(&mut self) -> &ChallengeState {
        self.challenge = ChallengeState {
            first: self.rng.gen_range(OPERAND_RANGE),
            second: self.rng.gen_range(OPERAND_RANGE),
            generation: self.challenge.generation + 1,
        };
        &self.challenge
    }

    /// Any content at all in the decoy field marks the attempt as automated.
    pub fn check_honeypot(&self, value: &str) -> Result<(), SpamSuppressed> {
        if value.is_empty() {
            Ok(())
        } else {
            Err(SpamSuppressed)
        }
    }

    pub fn check_challenge(&self, answer: &str) -> Result<(), ChallengeError> {
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            return Err(ChallengeError::Missing);
        }
        match leading_integer(trimmed) {
            None => Err(ChallengeError::NotANumber),
            Some(value) if value == self.challenge.answer() => Ok(()),
            // Out of range for i64 still parsed as a number, just not the sum.
            Some(_) => Err(ChallengeError::Incorrect),
        }
    }
}

/// Reads an optional sign followed by the leading run of ASCII digits and
/// ignores whatever follows, so `"7.0"` and `"7abc"` both read as 7.
/// Returns `None` when no digit leads the text and `Some(i64::MAX)` on
/// overflow.
fn leading_integer(text: &str) -> Option<i64> {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value = rest[..digits]
        .parse::<i64>()
        .map(|value| if negative { -value } else { value })
        .unwrap_or(i64::MAX);
    Some(value)
}

impl Default for AntiSpamGuard {
    fn default() -> Self {
        Self::new()
    }
}
