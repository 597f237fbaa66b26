use rand::{rngs::OsRng, RngCore};

/// Draws a fresh seed for the process-wide index source when none is configured.
pub fn generate_index_seed() -> u64 {
    OsRng.next_u64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_index_seed_varies() {
        // 64 bits of entropy; two equal draws in a row would point at a broken RNG
        let a = generate_index_seed();
        let b = generate_index_seed();
        assert_ne!(a, b, "Two consecutive seeds should differ");
    }
}
