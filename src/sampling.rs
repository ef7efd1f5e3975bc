//! L4: uniform rejection sampling of the public matrix A from a SHAKE-128 XOF.
//!
//! Driven through the plain [`XofReader`](crate::shake::XofReader) rather
//! than a hardware-style FSM cycle-by-cycle over a simulated byte stream —
//! same rejection rule, same byte order, no FSM.

use crate::params::{K, N, Q, SYMBYTES};
use crate::poly::{self, Normal, Ntt, Poly};
use crate::polyvec::PolyVec;
use crate::shake::XofReader;

pub type Matrix = [PolyVec<Ntt>; K];

/// Parse a stream of uniform bytes into N rejection-sampled coefficients in
/// [0, q), interpreting each group of 3 bytes as two 12-bit little-endian
/// values.
fn parse_uniform(stream: &mut XofReader) -> Poly<Normal> {
    let mut p = Poly::zero();
    let mut accepted = 0usize;
    let mut triple = [0u8; 3];
    while accepted < N {
        stream.fill(&mut triple);
        let d1 = (triple[0] as u16) | (((triple[1] as u16) & 0x0F) << 8);
        let d2 = ((triple[1] as u16) >> 4) | ((triple[2] as u16) << 4);

        if d1 < Q as u16 {
            p.coeffs[accepted] = d1 as i16;
            accepted += 1;
        }
        if accepted < N && d2 < Q as u16 {
            p.coeffs[accepted] = d2 as i16;
            accepted += 1;
        }
    }
    p
}

/// Derive the public matrix A (or its transpose) from seed rho, in NTT
/// domain. `A[i][j]` is generated by absorbing `rho || j || i` (or `rho || i
/// || j` when `transposed`) into SHAKE-128.
pub fn gen_matrix(rho: &[u8; SYMBYTES], transposed: bool) -> Matrix {
    let mut a: Matrix = [PolyVec::<Ntt>::zero(); K];

    for i in 0..K {
        for j in 0..K {
            let mut inbuf = [0u8; SYMBYTES + 2];
            inbuf[..SYMBYTES].copy_from_slice(rho);
            let (x, y) = if transposed { (i as u8, j as u8) } else { (j as u8, i as u8) };
            inbuf[SYMBYTES] = x;
            inbuf[SYMBYTES + 1] = y;

            let mut stream = XofReader::shake128(&inbuf);
            let p = parse_uniform(&mut stream);
            a[i].polys[j] = poly::ntt_forward(p);
        }
    }

    a
}
