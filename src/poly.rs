//! L5: the polynomial layer — `Poly<D>`, a `[i16; N]` tagged at the type level
//! with its representation domain (coefficient space vs. NTT/evaluation
//! space), plus compression and byte (de)serialization.
//!
//! The domain is a zero-sized phantom marker so `poly_basemul` can only be
//! called on two `Poly<Ntt>` values and `compress`/`tobytes` can only be
//! called on a `Poly<Normal>` — mixing them is a compile error, not a
//! calling convention to remember.

use core::marker::PhantomData;
use zeroize::Zeroize;

use crate::params::{DU, DV, MONT_R2, N, POLYBYTES, POLYCOMPRESSEDBYTES_DU, POLYCOMPRESSEDBYTES_DV, Q, SYMBYTES};
use crate::reduce::{barrett_reduce, csubq, fqmul};
use crate::ntt;

/// Marker for coefficient-space (standard) representation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Normal;
/// Marker for NTT/evaluation-space representation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ntt;

/// A degree-(N-1) polynomial over Z_q, tagged with its representation domain.
#[derive(Clone, Copy)]
pub struct Poly<D> {
    pub coeffs: [i16; N],
    _domain: PhantomData<D>,
}

impl<D> Poly<D> {
    pub const fn zero() -> Self {
        Poly { coeffs: [0i16; N], _domain: PhantomData }
    }
}

impl<D> Default for Poly<D> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<D> Zeroize for Poly<D> {
    fn zeroize(&mut self) {
        self.coeffs.zeroize();
    }
}

pub fn add<D>(a: &Poly<D>, b: &Poly<D>) -> Poly<D> {
    let mut r = Poly::zero();
    for i in 0..N {
        r.coeffs[i] = a.coeffs[i].wrapping_add(b.coeffs[i]);
    }
    r
}

pub fn sub<D>(a: &Poly<D>, b: &Poly<D>) -> Poly<D> {
    let mut r = Poly::zero();
    for i in 0..N {
        r.coeffs[i] = a.coeffs[i].wrapping_sub(b.coeffs[i]);
    }
    r
}

pub fn reduce<D>(p: &mut Poly<D>) {
    for c in p.coeffs.iter_mut() {
        *c = barrett_reduce(*c);
    }
}

pub fn csubq_poly<D>(p: &mut Poly<D>) {
    for c in p.coeffs.iter_mut() {
        *c = csubq(*c);
    }
}

/// Scale every coefficient into Montgomery domain: `a*R mod q`. Generic over
/// the domain tag — keygen needs this on an NTT-domain accumulator (see
/// `indcpa::keypair`), not just on coefficient-domain polys.
pub fn tomont<D>(p: &Poly<D>) -> Poly<D> {
    let mut r = Poly::zero();
    for i in 0..N {
        r.coeffs[i] = fqmul(p.coeffs[i], MONT_R2);
    }
    r
}

/// Forward NTT: coefficient domain -> evaluation domain. Exact, not
/// Montgomery-prescaled — the `zetas` table is already in Montgomery
/// domain, so `fqmul` inside `ntt::ntt` supplies the only factor of R this
/// transform needs. Prescaling here would inject an extra, uncancelled R
/// into every NTT-domain value.
pub fn ntt_forward(p: Poly<Normal>) -> Poly<Ntt> {
    let mut work = p.coeffs;
    ntt::ntt(&mut work);
    let mut out: Poly<Ntt> = Poly { coeffs: work, _domain: PhantomData };
    reduce(&mut out);
    out
}

/// Inverse NTT: evaluation domain -> coefficient domain.
pub fn invntt(p: Poly<Ntt>) -> Poly<Normal> {
    let mut work = p.coeffs;
    ntt::invntt(&mut work);
    Poly { coeffs: work, _domain: PhantomData }
}

/// Pointwise (incomplete-NTT) multiplication of two evaluation-domain polys.
pub fn basemul(a: &Poly<Ntt>, b: &Poly<Ntt>) -> Poly<Ntt> {
    let mut r = Poly::zero();
    ntt::poly_basemul(&mut r.coeffs, &a.coeffs, &b.coeffs);
    r
}

// -----------------------------------------------------------------------------
// Serialization (coefficient domain only — callers must invntt first).
// -----------------------------------------------------------------------------

pub fn tobytes(p: &Poly<Normal>) -> [u8; POLYBYTES] {
    let mut t = [0u16; N];
    for i in 0..N {
        t[i] = csubq(barrett_reduce(p.coeffs[i])) as u16;
    }
    let mut out = [0u8; POLYBYTES];
    for i in 0..(N / 2) {
        let t0 = t[2 * i];
        let t1 = t[2 * i + 1];
        out[3 * i] = (t0 & 0xFF) as u8;
        out[3 * i + 1] = ((t0 >> 8) as u8) | ((t1 << 4) as u8);
        out[3 * i + 2] = (t1 >> 4) as u8;
    }
    out
}

pub fn frombytes(b: &[u8; POLYBYTES]) -> Poly<Normal> {
    let mut p = Poly::zero();
    for i in 0..(N / 2) {
        let b0 = b[3 * i] as u16;
        let b1 = b[3 * i + 1] as u16;
        let b2 = b[3 * i + 2] as u16;
        p.coeffs[2 * i] = (b0 | ((b1 & 0x0F) << 8)) as i16;
        p.coeffs[2 * i + 1] = (((b1 >> 4) | (b2 << 4)) & 0x0FFF) as i16;
    }
    p
}

// -----------------------------------------------------------------------------
// Compression / decompression
// -----------------------------------------------------------------------------

fn compress_coeff(a: i16, d: u32) -> u16 {
    let canon = csubq(barrett_reduce(a)) as u32;
    let num = (canon << d) + (Q as u32) / 2;
    (num / (Q as u32)) as u16 & ((1u32 << d) - 1) as u16
}

fn decompress_coeff(t: u16, d: u32) -> i16 {
    let num = (t as u32) * (Q as u32) + (1u32 << (d - 1));
    (num >> d) as i16
}

pub fn compress_du(p: &Poly<Normal>) -> [u8; POLYCOMPRESSEDBYTES_DU] {
    debug_assert_eq!(DU, 10);
    let mut out = [0u8; POLYCOMPRESSEDBYTES_DU];
    for i in 0..(N / 4) {
        let t0 = compress_coeff(p.coeffs[4 * i], 10);
        let t1 = compress_coeff(p.coeffs[4 * i + 1], 10);
        let t2 = compress_coeff(p.coeffs[4 * i + 2], 10);
        let t3 = compress_coeff(p.coeffs[4 * i + 3], 10);
        let k = 5 * i;
        out[k] = (t0 & 0xFF) as u8;
        out[k + 1] = ((t0 >> 8) as u8) | (((t1 & 0x3F) as u8) << 2);
        out[k + 2] = ((t1 >> 6) as u8) | (((t2 & 0x0F) as u8) << 4);
        out[k + 3] = ((t2 >> 4) as u8) | (((t3 & 0x03) as u8) << 6);
        out[k + 4] = (t3 >> 2) as u8;
    }
    out
}

pub fn decompress_du(b: &[u8; POLYCOMPRESSEDBYTES_DU]) -> Poly<Normal> {
    debug_assert_eq!(DU, 10);
    let mut p = Poly::zero();
    for i in 0..(N / 4) {
        let k = 5 * i;
        let d0 = (b[k] as u16) | (((b[k + 1] as u16) & 0x03) << 8);
        let d1 = ((b[k + 1] as u16) >> 2) | (((b[k + 2] as u16) & 0x0F) << 6);
        let d2 = ((b[k + 2] as u16) >> 4) | (((b[k + 3] as u16) & 0x3F) << 4);
        let d3 = ((b[k + 3] as u16) >> 6) | ((b[k + 4] as u16) << 2);
        p.coeffs[4 * i] = decompress_coeff(d0, 10);
        p.coeffs[4 * i + 1] = decompress_coeff(d1, 10);
        p.coeffs[4 * i + 2] = decompress_coeff(d2, 10);
        p.coeffs[4 * i + 3] = decompress_coeff(d3, 10);
    }
    p
}

pub fn compress_dv(p: &Poly<Normal>) -> [u8; POLYCOMPRESSEDBYTES_DV] {
    debug_assert_eq!(DV, 4);
    let mut out = [0u8; POLYCOMPRESSEDBYTES_DV];
    for i in 0..(N / 2) {
        let t0 = compress_coeff(p.coeffs[2 * i], 4);
        let t1 = compress_coeff(p.coeffs[2 * i + 1], 4);
        out[i] = (t0 as u8) | ((t1 as u8) << 4);
    }
    out
}

pub fn decompress_dv(b: &[u8; POLYCOMPRESSEDBYTES_DV]) -> Poly<Normal> {
    debug_assert_eq!(DV, 4);
    let mut p = Poly::zero();
    for i in 0..(N / 2) {
        let t0 = (b[i] & 0x0F) as u16;
        let t1 = (b[i] >> 4) as u16;
        p.coeffs[2 * i] = decompress_coeff(t0, 4);
        p.coeffs[2 * i + 1] = decompress_coeff(t1, 4);
    }
    p
}

// -----------------------------------------------------------------------------
// Message <-> poly
// -----------------------------------------------------------------------------

pub fn frommsg(msg: &[u8; SYMBYTES]) -> Poly<Normal> {
    let mut p = Poly::zero();
    let half_q = (Q as i32 + 1) / 2;
    for i in 0..N {
        let bit = (msg[i >> 3] >> (i & 7)) & 1;
        p.coeffs[i] = if bit == 1 { half_q as i16 } else { 0 };
    }
    p
}

pub fn tomsg(p: &Poly<Normal>) -> [u8; SYMBYTES] {
    let mut msg = [0u8; SYMBYTES];
    for i in 0..SYMBYTES {
        let mut byte = 0u8;
        for j in 0..8 {
            let t = compress_coeff(p.coeffs[8 * i + j], 1);
            byte |= (t as u8 & 1) << j;
        }
        msg[i] = byte;
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_poly() -> Poly<Normal> {
        let mut p = Poly::zero();
        for i in 0..N {
            p.coeffs[i] = ((i * 17 + 3) % (Q as usize)) as i16;
        }
        p
    }

    #[test]
    fn tobytes_frombytes_roundtrip() {
        let p = sample_poly();
        let bytes = tobytes(&p);
        let back = frombytes(&bytes);
        assert_eq!(p.coeffs, back.coeffs);
    }

    #[test]
    fn compress_decompress_du_is_lossy_but_close() {
        let p = sample_poly();
        let packed = compress_du(&p);
        let back = decompress_du(&packed);
        // Compression at DU=10 bits should stay within a small rounding error.
        for i in 0..N {
            let orig = p.coeffs[i] as i32;
            let rec = back.coeffs[i] as i32;
            let diff = (orig - rec).abs().min((Q as i32) - (orig - rec).abs());
            assert!(diff <= 4, "coefficient {i} drifted too far: {orig} vs {rec}");
        }
    }

    #[test]
    fn frommsg_tomsg_roundtrip() {
        let mut msg = [0u8; SYMBYTES];
        for (i, b) in msg.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(91).wrapping_add(13);
        }
        let p = frommsg(&msg);
        let back = tomsg(&p);
        assert_eq!(msg, back);
    }

    #[test]
    fn zero_message_maps_to_zero_poly() {
        let msg = [0u8; SYMBYTES];
        let p = frommsg(&msg);
        assert_eq!(p.coeffs, [0i16; N]);
    }

    #[quickcheck_macros::quickcheck]
    fn prop_tobytes_frombytes_roundtrips_canonical_polys(seed: u16) -> bool {
        let mut p = Poly::<Normal>::zero();
        for i in 0..N {
            p.coeffs[i] = ((i as u32 * 7 + seed as u32) % (Q as u32)) as i16;
        }
        frombytes(&tobytes(&p)).coeffs == p.coeffs
    }

    #[quickcheck_macros::quickcheck]
    fn prop_tomsg_frommsg_roundtrips_any_message(bytes: Vec<u8>) -> bool {
        let mut msg = [0u8; SYMBYTES];
        for (i, b) in msg.iter_mut().enumerate() {
            *b = *bytes.get(i).unwrap_or(&0);
        }
        tomsg(&frommsg(&msg)) == msg
    }
}
