//! L8: randomness sourcing.
//!
//! The core KEM operations never call an RNG directly — they take caller
//! supplied random bytes (see [`crate::kem`]) so the FO transform stays
//! testable with fixed vectors. This module supplies the two ways a caller
//! can actually get those bytes: a generic `rand_core::RngCore + CryptoRng`
//! collaborator, or the process-wide OS RNG via `getrandom`.

use rand_core::{CryptoRng, RngCore};

use crate::error::KemError;

/// Fill `out` using any `RngCore + CryptoRng` source.
pub fn fill_from_rng<R: RngCore + CryptoRng>(rng: &mut R, out: &mut [u8]) -> Result<(), KemError> {
    rng.try_fill_bytes(out).map_err(|_| KemError::RngFailure)
}

/// Fill `out` from the operating system's CSPRNG.
pub fn fill_from_os(out: &mut [u8]) -> Result<(), KemError> {
    getrandom::getrandom(out).map_err(|_| KemError::RngFailure)
}

/// An `RngCore + CryptoRng` source backed directly by [`fill_from_os`], for
/// callers of the `lib.rs` facade functions that don't want to thread a
/// generic RNG of their own through the call.
pub struct OsRng;

impl RngCore for OsRng {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }
    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        getrandom::getrandom(dest).expect("OS RNG failure");
    }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        fill_from_os(dest).map_err(|_| rand_core::Error::new("getrandom failure"))
    }
}

impl CryptoRng for OsRng {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::impls;

    struct CountingRng(u64);

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.0 = self.0.wrapping_add(1);
            self.0 as u32
        }
        fn next_u64(&mut self) -> u64 {
            self.0 = self.0.wrapping_add(1);
            self.0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            impls::fill_bytes_via_next(self, dest);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }
    impl CryptoRng for CountingRng {}

    #[test]
    fn fill_from_rng_fills_the_whole_buffer() {
        let mut rng = CountingRng(0);
        let mut buf = [0u8; 32];
        fill_from_rng(&mut rng, &mut buf).unwrap();
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn fill_from_os_produces_differing_outputs() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        fill_from_os(&mut a).unwrap();
        fill_from_os(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
