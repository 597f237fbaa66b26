use std::sync::Mutex;

use rand::{rngs::StdRng, Rng, SeedableRng};
use surety_common::{Result, SuretyError};

/// Process-wide source of small pseudo-random indexes.
pub trait IndexSource: Send + Sync {
    /// Draws a value in `0..range`.
    fn draw(&self, range: u8) -> Result<u8>;
}

/// `StdRng` seeded once, shared by the directory and the consensus engine.
#[derive(Debug)]
pub struct SeededIndexSource {
    rng: Mutex<StdRng>,
}

impl SeededIndexSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl IndexSource for SeededIndexSource {
    fn draw(&self, range: u8) -> Result<u8> {
        if range == 0 {
            return Err(SuretyError::InvalidInput("index range must be positive".into()));
        }
        let mut rng = self.rng.lock()?;
        Ok(rng.gen_range(0..range))
    }
}
