//! Test-only random sources.

use rand::RngCore;

/// Random source that replays a fixed list of `f64` draws in a loop.
///
/// `rng.gen::<f64>()` takes the top 53 bits of `next_u64`, so dyadic draws
/// such as `0.5` or `0.25` come back exactly.
pub(crate) struct ScriptedRng {
    draws: Vec<f64>,
    next: usize,
}

impl ScriptedRng {
    pub(crate) fn new(draws: Vec<f64>) -> Self {
        Self { draws, next: 0 }
    }

    /// Number of `u64` values handed out so far.
    pub(crate) fn consumed(&self) -> usize {
        self.next
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let draw = self.draws[self.next % self.draws.len()];
        self.next += 1;
        ((draw * (1u64 << 53) as f64) as u64) << 11
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
