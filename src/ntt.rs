//! L2: the (incomplete) Number-Theoretic Transform over Z_q[X]/(X^256+1).
//!
//! Expressed as a straight-line software loop over a `[i16; N]` array —
//! ordinary CPU execution, not an FSM driven over simulated BRAM ports.
//! Butterfly formulas, zeta consumption order, and final scaling follow the
//! standard Cooley-Tukey forward / Gentleman-Sande inverse NTT.

use crate::params::{INVNTT_F, N};
use crate::reduce::{barrett_reduce, fqmul};

/// Forward (Cooley-Tukey) NTT, in place. `r` is plain (non-Montgomery)
/// coefficient domain; `ZETAS` is itself stored in Montgomery form, so each
/// `fqmul(zeta, x)` butterfly multiply already lands back in plain domain.
/// No prescaling of `r` is needed or wanted.
pub fn ntt(r: &mut [i16; N]) {
    let mut k = 1usize;
    let mut len = 128usize;
    while len >= 2 {
        let mut start = 0usize;
        while start < N {
            let zeta = crate::params::ZETAS[k];
            k += 1;
            for j in start..start + len {
                let t = fqmul(zeta, r[j + len]);
                r[j + len] = r[j].wrapping_sub(t);
                r[j] = r[j].wrapping_add(t);
            }
            start += 2 * len;
        }
        len >>= 1;
    }
}

/// Inverse (Gentleman-Sande) NTT, in place. The unnormalized GS butterflies
/// accumulate a factor of 128 that the final per-coefficient multiply by
/// `f = 2^-7 * R mod q` removes, but that same multiply, being an `fqmul`,
/// also leaves one residual factor of `R` behind. So `invntt(ntt(p)) == R*p`,
/// not `p`: this function's output sits in Montgomery domain, one `tomont`
/// away from plain (see `poly::tomont`, and `indcpa::keypair`'s use of it).
pub fn invntt(r: &mut [i16; N]) {
    let mut k = 127usize;
    let mut len = 2usize;
    while len <= 128 {
        let mut start = 0usize;
        while start < N {
            let zeta = crate::params::ZETAS[k];
            k -= 1;
            for j in start..start + len {
                let t = r[j];
                r[j] = barrett_reduce(t.wrapping_add(r[j + len]));
                r[j + len] = fqmul(zeta, r[j + len].wrapping_sub(t));
            }
            start += 2 * len;
        }
        len <<= 1;
    }

    for coeff in r.iter_mut() {
        *coeff = fqmul(*coeff, INVNTT_F);
    }
}

/// Multiply two degree-1 polynomials mod (X^2 - zeta): (a0+a1 X)(b0+b1 X).
#[inline]
fn basemul(a0: i16, a1: i16, b0: i16, b1: i16, zeta: i16) -> (i16, i16) {
    let r0 = fqmul(a0, b0).wrapping_add(fqmul(fqmul(a1, b1), zeta));
    let r1 = fqmul(a0, b1).wrapping_add(fqmul(a1, b0));
    (r0, r1)
}

/// Pointwise product of two polys already in (incomplete) NTT domain.
pub fn poly_basemul(r: &mut [i16; N], a: &[i16; N], b: &[i16; N]) {
    for i in 0..(N / 4) {
        let zeta = crate::params::ZETAS[64 + i];

        let (r0, r1) = basemul(a[4 * i], a[4 * i + 1], b[4 * i], b[4 * i + 1], zeta);
        r[4 * i] = r0;
        r[4 * i + 1] = r1;

        let (r2, r3) = basemul(a[4 * i + 2], a[4 * i + 3], b[4 * i + 2], b[4 * i + 3], -zeta);
        r[4 * i + 2] = r2;
        r[4 * i + 3] = r3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Q;
    use crate::reduce::barrett_reduce;

    fn to_canonical(p: &[i16; N]) -> [i16; N] {
        let mut out = [0i16; N];
        for (o, &c) in out.iter_mut().zip(p.iter()) {
            *o = barrett_reduce(c).rem_euclid(Q);
        }
        out
    }

    fn naive_mul(a: &[i16; N], b: &[i16; N]) -> [i16; N] {
        // X^256 = -1, so this is negacyclic convolution.
        let mut acc = [0i64; N];
        for i in 0..N {
            for j in 0..N {
                let idx = i + j;
                let v = (a[i] as i64) * (b[j] as i64);
                if idx < N {
                    acc[idx] += v;
                } else {
                    acc[idx - N] -= v;
                }
            }
        }
        let mut out = [0i16; N];
        for i in 0..N {
            out[i] = acc[i].rem_euclid(Q as i64) as i16;
        }
        out
    }

    #[test]
    fn ntt_then_invntt_recovers_the_montgomery_scaled_original() {
        let mut p = [0i16; N];
        for i in 0..N {
            p[i] = ((i * 37 + 5) % (Q as usize)) as i16;
        }

        let mut work = p;
        ntt(&mut work);
        invntt(&mut work);

        // invntt(ntt(x)) == R*x, not x (see invntt's doc comment), so compare
        // against the explicitly Montgomery-scaled original instead of the
        // plain one.
        let mut expected = p;
        for c in expected.iter_mut() {
            *c = fqmul(*c, crate::params::MONT_R2);
        }

        assert_eq!(to_canonical(&work), to_canonical(&expected));
    }

    #[test]
    fn basemul_matches_naive_negacyclic_convolution() {
        let mut a = [0i16; N];
        let mut b = [0i16; N];
        for i in 0..N {
            a[i] = ((i * 3 + 1) % 7) as i16 - 3;
            b[i] = ((i * 5 + 2) % 7) as i16 - 3;
        }

        let expected = naive_mul(&a, &b);

        let mut a_hat = a;
        let mut b_hat = b;
        ntt(&mut a_hat);
        ntt(&mut b_hat);

        let mut r_hat = [0i16; N];
        poly_basemul(&mut r_hat, &a_hat, &b_hat);
        invntt(&mut r_hat);

        // basemul's one residual R^-1 and invntt's one residual R cancel
        // exactly, so this round trip lands back in plain domain with no
        // compensation needed.
        assert_eq!(to_canonical(&r_hat), to_canonical(&expected));
    }
}
