//! L5: `PolyVec<D>`, a fixed-length array of K domain-tagged polynomials, and
//! its packing/compression over the typed `Poly<D>` layer.

use zeroize::Zeroize;

use crate::params::{K, POLYBYTES, POLYCOMPRESSEDBYTES_DU, POLYVECBYTES, POLYVECCOMPRESSEDBYTES};
use crate::poly::{self, Normal, Ntt, Poly};

#[derive(Clone, Copy)]
pub struct PolyVec<D> {
    pub polys: [Poly<D>; K],
}

impl<D: Copy> PolyVec<D> {
    pub fn zero() -> Self
    where
        Poly<D>: Copy,
    {
        PolyVec { polys: [Poly::zero(); K] }
    }
}

impl<D> Zeroize for PolyVec<D> {
    fn zeroize(&mut self) {
        for p in self.polys.iter_mut() {
            p.zeroize();
        }
    }
}

pub fn add<D: Copy>(a: &PolyVec<D>, b: &PolyVec<D>) -> PolyVec<D>
where
    Poly<D>: Copy,
{
    let mut r = PolyVec::zero();
    for i in 0..K {
        r.polys[i] = poly::add(&a.polys[i], &b.polys[i]);
    }
    r
}

pub fn reduce(v: &mut PolyVec<Ntt>) {
    for p in v.polys.iter_mut() {
        poly::reduce(p);
    }
}

pub fn ntt(v: PolyVec<Normal>) -> PolyVec<Ntt> {
    let mut out = PolyVec::<Ntt>::zero();
    for i in 0..K {
        out.polys[i] = poly::ntt_forward(v.polys[i]);
    }
    out
}

pub fn invntt(v: PolyVec<Ntt>) -> PolyVec<Normal> {
    let mut out = PolyVec::<Normal>::zero();
    for i in 0..K {
        out.polys[i] = poly::invntt(v.polys[i]);
    }
    out
}

/// Dot product of two NTT-domain polyvecs, reduced at the end.
pub fn basemul_acc(a: &PolyVec<Ntt>, b: &PolyVec<Ntt>) -> Poly<Ntt> {
    let mut r = poly::basemul(&a.polys[0], &b.polys[0]);
    for i in 1..K {
        let term = poly::basemul(&a.polys[i], &b.polys[i]);
        r = poly::add(&r, &term);
    }
    poly::reduce(&mut r);
    r
}

pub fn tobytes(v: &PolyVec<Normal>) -> [u8; POLYVECBYTES] {
    let mut out = [0u8; POLYVECBYTES];
    for i in 0..K {
        let chunk = poly::tobytes(&v.polys[i]);
        out[i * POLYBYTES..(i + 1) * POLYBYTES].copy_from_slice(&chunk);
    }
    out
}

pub fn frombytes(b: &[u8; POLYVECBYTES]) -> PolyVec<Normal> {
    let mut v = PolyVec::<Normal>::zero();
    for i in 0..K {
        let mut chunk = [0u8; POLYBYTES];
        chunk.copy_from_slice(&b[i * POLYBYTES..(i + 1) * POLYBYTES]);
        v.polys[i] = poly::frombytes(&chunk);
    }
    v
}

pub fn compress_du(v: &PolyVec<Normal>) -> [u8; POLYVECCOMPRESSEDBYTES] {
    let mut out = [0u8; POLYVECCOMPRESSEDBYTES];
    for i in 0..K {
        let chunk = poly::compress_du(&v.polys[i]);
        out[i * POLYCOMPRESSEDBYTES_DU..(i + 1) * POLYCOMPRESSEDBYTES_DU].copy_from_slice(&chunk);
    }
    out
}

pub fn decompress_du(b: &[u8; POLYVECCOMPRESSEDBYTES]) -> PolyVec<Normal> {
    let mut v = PolyVec::<Normal>::zero();
    for i in 0..K {
        let mut chunk = [0u8; POLYCOMPRESSEDBYTES_DU];
        chunk.copy_from_slice(&b[i * POLYCOMPRESSEDBYTES_DU..(i + 1) * POLYCOMPRESSEDBYTES_DU]);
        v.polys[i] = poly::decompress_du(&chunk);
    }
    v
}
