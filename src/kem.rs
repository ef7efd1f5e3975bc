//! L7: the Fujisaki-Okamoto transform turning the IND-CPA PKE of
//! [`crate::indcpa`] into an IND-CCA2 KEM with constant-time implicit
//! rejection.
//!
//! `m' = H(m)`, `(Kbar, r) = G(m' || H(pk))`, ciphertext re-encryption and
//! comparison via `subtle`'s `ConstantTimeEq`/`Choice` for the
//! compare-and-select step.

use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::indcpa;
use crate::params::{
    CIPHERTEXTBYTES, INDCPA_SECRETKEYBYTES, PUBLICKEYBYTES, SECRETKEYBYTES, SYMBYTES,
};
use crate::shake::{sha3_256, sha3_512, shake256};

/// Constant-time "select": writes `src` into `dst` iff `mask` is true, with
/// no branch whose outcome depends on the data being compared.
#[inline(always)]
fn cmov(dst: &mut [u8], src: &[u8], mask: Choice) {
    let m = (mask.unwrap_u8().wrapping_neg()) as u8; // 0xFF if mask, 0x00 otherwise
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d = (*d & !m) | (*s & m);
    }
}

/// `sk = sk_cpa || pk || H(pk) || z`.
pub fn keypair(d: &[u8; SYMBYTES], z: &[u8; SYMBYTES]) -> ([u8; PUBLICKEYBYTES], [u8; SECRETKEYBYTES]) {
    let (pk, sk_cpa) = indcpa::keypair(d);
    let h_pk = indcpa::hash_pk(&pk);

    let mut sk = [0u8; SECRETKEYBYTES];
    let mut off = 0usize;
    sk[off..off + INDCPA_SECRETKEYBYTES].copy_from_slice(&sk_cpa);
    off += INDCPA_SECRETKEYBYTES;
    sk[off..off + PUBLICKEYBYTES].copy_from_slice(&pk);
    off += PUBLICKEYBYTES;
    sk[off..off + SYMBYTES].copy_from_slice(&h_pk);
    off += SYMBYTES;
    sk[off..off + SYMBYTES].copy_from_slice(z);

    (pk, sk)
}

/// Deterministic encapsulation from explicit randomness `m`.
///
/// `m' = H(m)`, `(Kbar, r) = G(m' || H(pk))`, `c = PKE.Enc(pk, m', r)`,
/// `ss = KDF(Kbar || H(c))`.
pub fn encapsulate(pk: &[u8; PUBLICKEYBYTES], m: &[u8; SYMBYTES]) -> ([u8; CIPHERTEXTBYTES], [u8; SYMBYTES]) {
    let mut m_prime = sha3_256(m);
    let h_pk = indcpa::hash_pk(pk);

    let mut g_in = [0u8; 2 * SYMBYTES];
    g_in[..SYMBYTES].copy_from_slice(&m_prime);
    g_in[SYMBYTES..].copy_from_slice(&h_pk);
    let g = sha3_512(&g_in);

    let mut k_bar = [0u8; SYMBYTES];
    let mut coins = [0u8; SYMBYTES];
    k_bar.copy_from_slice(&g[..SYMBYTES]);
    coins.copy_from_slice(&g[SYMBYTES..]);

    let ct = indcpa::encrypt(pk, &m_prime, &coins);

    let h_ct = sha3_256(&ct);
    let mut kdf_in = [0u8; 2 * SYMBYTES];
    kdf_in[..SYMBYTES].copy_from_slice(&k_bar);
    kdf_in[SYMBYTES..].copy_from_slice(&h_ct);
    let mut ss = [0u8; SYMBYTES];
    shake256(&kdf_in, &mut ss);

    m_prime.zeroize();
    k_bar.zeroize();
    coins.zeroize();
    g_in.zeroize();
    kdf_in.zeroize();

    (ct, ss)
}

/// Decapsulation with constant-time implicit rejection: on ciphertext
/// mismatch, silently returns `KDF(z || c)` instead of an error.
pub fn decapsulate(sk: &[u8; SECRETKEYBYTES], ct: &[u8; CIPHERTEXTBYTES]) -> [u8; SYMBYTES] {
    let pk_off = INDCPA_SECRETKEYBYTES;
    let h_off = pk_off + PUBLICKEYBYTES;
    let z_off = h_off + SYMBYTES;

    let mut sk_cpa = [0u8; INDCPA_SECRETKEYBYTES];
    sk_cpa.copy_from_slice(&sk[..INDCPA_SECRETKEYBYTES]);

    let mut pk = [0u8; PUBLICKEYBYTES];
    pk.copy_from_slice(&sk[pk_off..pk_off + PUBLICKEYBYTES]);

    let mut h_pk = [0u8; SYMBYTES];
    h_pk.copy_from_slice(&sk[h_off..h_off + SYMBYTES]);

    let mut z = [0u8; SYMBYTES];
    z.copy_from_slice(&sk[z_off..z_off + SYMBYTES]);

    let mut m_prime = indcpa::decrypt(&sk_cpa, ct);

    let mut g_in = [0u8; 2 * SYMBYTES];
    g_in[..SYMBYTES].copy_from_slice(&m_prime);
    g_in[SYMBYTES..].copy_from_slice(&h_pk);
    let g = sha3_512(&g_in);

    let mut k_bar = [0u8; SYMBYTES];
    let mut coins = [0u8; SYMBYTES];
    k_bar.copy_from_slice(&g[..SYMBYTES]);
    coins.copy_from_slice(&g[SYMBYTES..]);

    let ct_prime = indcpa::encrypt(&pk, &m_prime, &coins);

    // fail = 1 iff ct != ct_prime
    let matches: Choice = ct.ct_eq(&ct_prime[..]);
    let fail = !matches;
    cmov(&mut k_bar, &z, fail);

    let h_ct = sha3_256(ct);
    let mut kdf_in = [0u8; 2 * SYMBYTES];
    kdf_in[..SYMBYTES].copy_from_slice(&k_bar);
    kdf_in[SYMBYTES..].copy_from_slice(&h_ct);
    let mut ss = [0u8; SYMBYTES];
    shake256(&kdf_in, &mut ss);

    sk_cpa.zeroize();
    m_prime.zeroize();
    g_in.zeroize();
    k_bar.zeroize();
    coins.zeroize();
    kdf_in.zeroize();
    z.zeroize();

    ss
}
