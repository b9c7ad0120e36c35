//! Element id allocation for embeds.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

pub const ID_PREFIX: &str = "echarts-";
/// Length of the random part: 26^12 possible values per id.
pub const ID_LEN: usize = 12;

pub trait IdSource: Send + Sync {
    /// Returns an id that has not been handed out before (with overwhelming probability).
    fn next_id(&self) -> String;
}

/// Random ids drawn from the random bits of a v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&self) -> String {
        // The low 64 bits hold the 2 variant bits (62-63); 12 base-26 digits use only the low ~57.
        encode(Uuid::new_v4().as_u128() as u64)
    }
}

/// Deterministic ids (`echarts-aaaaaaaaaaaa`, `echarts-aaaaaaaaaaab`, ...) for reproducible output.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        encode(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

fn encode(mut n: u64) -> String {
    let mut digits = [b'a'; ID_LEN];
    for slot in digits.iter_mut().rev() {
        *slot = b'a' + (n % 26) as u8;
        n /= 26;
    }
    let mut out = String::with_capacity(ID_PREFIX.len() + ID_LEN);
    out.push_str(ID_PREFIX);
    out.extend(digits.iter().map(|&b| b as char));
    out
}
