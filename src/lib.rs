//! Module-Learning-With-Errors KEM (ML-KEM-768 / Kyber) core.
//!
//! Layered bottom-up: field arithmetic ([`reduce`]), the Keccak/SHAKE sponge
//! ([`keccak`], [`shake`]), the NTT ([`ntt`]), domain-tagged polynomial
//! algebra ([`poly`], [`polyvec`]), noise/matrix sampling ([`cbd`],
//! [`sampling`]), the IND-CPA PKE ([`indcpa`]) and finally the IND-CCA2 KEM
//! obtained from it via the Fujisaki-Okamoto transform ([`kem`]).
//!
//! This crate implements exactly one parameter profile (ML-KEM-768, see
//! [`params`]) — there is no runtime configuration surface.

pub mod params;
pub mod reduce;
pub mod keccak;
pub mod shake;
pub mod ntt;
pub mod poly;
pub mod polyvec;
pub mod cbd;
pub mod sampling;
pub mod indcpa;
pub mod kem;
pub mod rng;
pub mod error;

use zeroize::{Zeroize, ZeroizeOnDrop};

pub use error::KemError;
pub use params::{CIPHERTEXTBYTES, PUBLICKEYBYTES, SECRETKEYBYTES, SSBYTES, SYMBYTES};

/// An ML-KEM-768 public key.
#[derive(Clone, Copy)]
pub struct PublicKey([u8; PUBLICKEYBYTES]);

/// An ML-KEM-768 secret key. Zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SecretKey([u8; SECRETKEYBYTES]);

/// An ML-KEM-768 ciphertext.
#[derive(Clone, Copy)]
pub struct Ciphertext([u8; CIPHERTEXTBYTES]);

/// A 32-byte shared secret. Zeroized on drop.
#[derive(Clone, ZeroizeOnDrop, PartialEq, Eq)]
pub struct SharedSecret([u8; SSBYTES]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; PUBLICKEYBYTES] {
        &self.0
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KemError> {
        if bytes.len() != PUBLICKEYBYTES {
            return Err(KemError::InvalidLength { expected: PUBLICKEYBYTES, got: bytes.len() });
        }
        let mut buf = [0u8; PUBLICKEYBYTES];
        buf.copy_from_slice(bytes);
        Ok(PublicKey(buf))
    }
}

impl SecretKey {
    pub fn as_bytes(&self) -> &[u8; SECRETKEYBYTES] {
        &self.0
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KemError> {
        if bytes.len() != SECRETKEYBYTES {
            return Err(KemError::InvalidLength { expected: SECRETKEYBYTES, got: bytes.len() });
        }
        let mut buf = [0u8; SECRETKEYBYTES];
        buf.copy_from_slice(bytes);
        Ok(SecretKey(buf))
    }
}

impl Ciphertext {
    pub fn as_bytes(&self) -> &[u8; CIPHERTEXTBYTES] {
        &self.0
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KemError> {
        if bytes.len() != CIPHERTEXTBYTES {
            return Err(KemError::InvalidLength { expected: CIPHERTEXTBYTES, got: bytes.len() });
        }
        let mut buf = [0u8; CIPHERTEXTBYTES];
        buf.copy_from_slice(bytes);
        Ok(Ciphertext(buf))
    }
}

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8; SSBYTES] {
        &self.0
    }
}

impl PublicKey {
    /// Encapsulate a fresh shared secret against this key, drawing
    /// randomness from `rng`. Thin method wrapper around
    /// [`kem_encapsulate`] for callers who'd rather not thread the key
    /// through a free function.
    pub fn encapsulate<R>(&self, rng: &mut R) -> Result<(Ciphertext, SharedSecret), KemError>
    where
        R: rand_core::RngCore + rand_core::CryptoRng,
    {
        kem_encapsulate(self, rng)
    }
}

impl SecretKey {
    /// Decapsulate `ct` under this key. Thin method wrapper around
    /// [`kem_decapsulate`]; infallible for the same reason that free
    /// function is — see its docs.
    pub fn decapsulate(&self, ct: &Ciphertext) -> SharedSecret {
        kem_decapsulate(self, ct)
    }
}

/// Generate a fresh keypair using the operating system's CSPRNG. A thin
/// convenience over [`kem_keygen`] for callers with no RNG of their own to
/// thread through.
pub fn kem_keypair() -> Result<(PublicKey, SecretKey), KemError> {
    kem_keygen(&mut rng::OsRng)
}

/// Generate a fresh keypair using `rng` to draw the key-generation seed `d`
/// and the implicit-rejection secret `z`.
#[tracing::instrument(name = "kem_keygen", skip_all)]
pub fn kem_keygen<R>(rng: &mut R) -> Result<(PublicKey, SecretKey), KemError>
where
    R: rand_core::RngCore + rand_core::CryptoRng,
{
    let mut d = [0u8; SYMBYTES];
    let mut z = [0u8; SYMBYTES];
    rng::fill_from_rng(rng, &mut d)?;
    rng::fill_from_rng(rng, &mut z)?;

    let (pk, sk) = kem::keypair(&d, &z);

    d.zeroize();
    z.zeroize();

    tracing::trace!(pk_bytes = PUBLICKEYBYTES, "generated keypair");
    Ok((PublicKey(pk), SecretKey(sk)))
}

/// Encapsulate a fresh shared secret against `pk`, drawing the FO seed `m`
/// from `rng`.
#[tracing::instrument(name = "kem_encapsulate", skip_all)]
pub fn kem_encapsulate<R>(pk: &PublicKey, rng: &mut R) -> Result<(Ciphertext, SharedSecret), KemError>
where
    R: rand_core::RngCore + rand_core::CryptoRng,
{
    let mut m = [0u8; SYMBYTES];
    rng::fill_from_rng(rng, &mut m)?;

    let (ct, ss) = kem::encapsulate(&pk.0, &m);
    m.zeroize();

    tracing::trace!(ct_bytes = CIPHERTEXTBYTES, "encapsulated shared secret");
    Ok((Ciphertext(ct), SharedSecret(ss)))
}

/// Decapsulate `ct` under `sk`. Never fails: on a tampered or mismatched
/// ciphertext this returns an unpredictable but deterministic shared secret
/// (implicit rejection), not an error, per the FO transform's security
/// requirement that decapsulation never signal a decryption failure.
#[tracing::instrument(name = "kem_decapsulate", skip_all)]
pub fn kem_decapsulate(sk: &SecretKey, ct: &Ciphertext) -> SharedSecret {
    let ss = kem::decapsulate(&sk.0, &ct.0);
    SharedSecret(ss)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::{impls, CryptoRng, RngCore};

    struct ReplayRng<'a> {
        data: &'a [u8],
        pos: usize,
    }

    impl<'a> ReplayRng<'a> {
        fn new(data: &'a [u8]) -> Self {
            ReplayRng { data, pos: 0 }
        }
    }

    impl<'a> RngCore for ReplayRng<'a> {
        fn next_u32(&mut self) -> u32 {
            impls::next_u32_via_fill(self)
        }
        fn next_u64(&mut self) -> u64 {
            impls::next_u64_via_fill(self)
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for b in dest.iter_mut() {
                *b = self.data[self.pos % self.data.len()];
                self.pos += 1;
            }
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }
    impl<'a> CryptoRng for ReplayRng<'a> {}

    #[test]
    fn honest_roundtrip_through_the_public_api() {
        let mut keygen_rng = ReplayRng::new(&[0x42; 64]);
        let (pk, sk) = kem_keygen(&mut keygen_rng).unwrap();

        let mut enc_rng = ReplayRng::new(&[0x99; 32]);
        let (ct, ss_enc) = kem_encapsulate(&pk, &mut enc_rng).unwrap();

        let ss_dec = kem_decapsulate(&sk, &ct);
        assert_eq!(ss_enc.as_bytes(), ss_dec.as_bytes());
    }

    #[test]
    fn all_zero_randomness_still_round_trips() {
        let mut keygen_rng = ReplayRng::new(&[0x00; 64]);
        let (pk, sk) = kem_keygen(&mut keygen_rng).unwrap();

        let mut enc_rng = ReplayRng::new(&[0x00; 32]);
        let (ct, ss_enc) = kem_encapsulate(&pk, &mut enc_rng).unwrap();

        let ss_dec = kem_decapsulate(&sk, &ct);
        assert_eq!(ss_enc.as_bytes(), ss_dec.as_bytes());
    }

    #[test]
    fn all_0xaa_randomness_still_round_trips() {
        let mut keygen_rng = ReplayRng::new(&[0xAA; 64]);
        let (pk, sk) = kem_keygen(&mut keygen_rng).unwrap();

        let mut enc_rng = ReplayRng::new(&[0xAA; 32]);
        let (ct, ss_enc) = kem_encapsulate(&pk, &mut enc_rng).unwrap();

        let ss_dec = kem_decapsulate(&sk, &ct);
        assert_eq!(ss_enc.as_bytes(), ss_dec.as_bytes());
    }

    #[test]
    fn flipping_a_single_ciphertext_bit_changes_the_decapsulated_secret() {
        let mut keygen_rng = ReplayRng::new(&[0x11; 64]);
        let (pk, sk) = kem_keygen(&mut keygen_rng).unwrap();

        let mut enc_rng = ReplayRng::new(&[0x22; 32]);
        let (mut ct, ss_enc) = kem_encapsulate(&pk, &mut enc_rng).unwrap();
        ct.0[100] ^= 0x01;

        let ss_dec = kem_decapsulate(&sk, &ct);
        assert_ne!(ss_enc.as_bytes(), ss_dec.as_bytes());
    }

    #[test]
    fn public_key_roundtrips_through_bytes() {
        let mut keygen_rng = ReplayRng::new(&[0x55; 64]);
        let (pk, _sk) = kem_keygen(&mut keygen_rng).unwrap();
        let bytes = *pk.as_bytes();
        let pk2 = PublicKey::from_bytes(&bytes).unwrap();
        assert_eq!(pk2.as_bytes(), &bytes);
    }

    #[test]
    fn from_bytes_rejects_wrong_length() {
        let err = PublicKey::from_bytes(&[0u8; 3]).unwrap_err();
        assert_eq!(err, KemError::InvalidLength { expected: PUBLICKEYBYTES, got: 3 });
    }

    #[test]
    fn method_facade_matches_free_function_facade() {
        let mut keygen_rng = ReplayRng::new(&[0x66; 64]);
        let (pk, sk) = kem_keygen(&mut keygen_rng).unwrap();

        let mut enc_rng = ReplayRng::new(&[0x77; 32]);
        let (ct, ss_enc) = pk.encapsulate(&mut enc_rng).unwrap();

        let ss_dec = sk.decapsulate(&ct);
        assert_eq!(ss_enc.as_bytes(), ss_dec.as_bytes());
    }

    #[test]
    fn kem_keypair_draws_from_the_os_rng_and_round_trips() {
        let (pk, sk) = kem_keypair().unwrap();

        let mut enc_rng = ReplayRng::new(&[0x88; 32]);
        let (ct, ss_enc) = pk.encapsulate(&mut enc_rng).unwrap();

        let ss_dec = sk.decapsulate(&ct);
        assert_eq!(ss_enc.as_bytes(), ss_dec.as_bytes());
    }
}
