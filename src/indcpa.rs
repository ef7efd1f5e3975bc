//! L6: the IND-CPA public-key encryption scheme underlying the KEM.
//!
//! ML-KEM-768 profile (K=3), built on the typed `Poly<D>`/`PolyVec<D>` layer.

use zeroize::Zeroize;

use crate::params::{
    ETA1, ETA2, INDCPA_BYTES, INDCPA_PUBLICKEYBYTES, INDCPA_SECRETKEYBYTES, K, SYMBYTES,
};
use crate::poly::{self, Normal, Ntt};
use crate::polyvec::{self, PolyVec};
use crate::sampling::gen_matrix;
use crate::shake::sha3_512;

/// `pk = encode(t_hat) || rho`.
fn pk_encode(t_hat: &PolyVec<Ntt>, rho: &[u8; SYMBYTES]) -> [u8; INDCPA_PUBLICKEYBYTES] {
    let mut out = [0u8; INDCPA_PUBLICKEYBYTES];
    let tbytes = polyvec::tobytes(&reinterpret_normal(t_hat));
    out[..tbytes.len()].copy_from_slice(&tbytes);
    out[tbytes.len()..].copy_from_slice(rho);
    out
}

fn pk_decode(pk: &[u8; INDCPA_PUBLICKEYBYTES]) -> (PolyVec<Ntt>, [u8; SYMBYTES]) {
    let polyvecbytes = crate::params::POLYVECBYTES;
    let mut tbytes = [0u8; crate::params::POLYVECBYTES];
    tbytes.copy_from_slice(&pk[..polyvecbytes]);
    let t_hat = reinterpret_ntt(&polyvec::frombytes(&tbytes));
    let mut rho = [0u8; SYMBYTES];
    rho.copy_from_slice(&pk[polyvecbytes..]);
    (t_hat, rho)
}

/// `Poly<Normal>`/`Poly<Ntt>` share the same coefficient-array layout; the
/// packed-byte encoding is domain-agnostic (it is just 12-bit packing), so
/// the only thing changing between pk_encode/pk_decode's "Normal" plumbing
/// and the NTT-domain values they actually carry is the type tag. This
/// helper makes that retagging explicit and localized rather than smuggling
/// it through an untagged alias.
fn reinterpret_normal(v: &PolyVec<Ntt>) -> PolyVec<Normal> {
    let mut out = PolyVec::<Normal>::zero();
    for i in 0..K {
        out.polys[i].coeffs = v.polys[i].coeffs;
    }
    out
}

fn reinterpret_ntt(v: &PolyVec<Normal>) -> PolyVec<Ntt> {
    let mut out = PolyVec::<Ntt>::zero();
    for i in 0..K {
        out.polys[i].coeffs = v.polys[i].coeffs;
    }
    out
}

fn ct_encode(u: &PolyVec<Normal>, v: &poly::Poly<Normal>) -> [u8; INDCPA_BYTES] {
    let mut out = [0u8; INDCPA_BYTES];
    let cu = polyvec::compress_du(u);
    out[..cu.len()].copy_from_slice(&cu);
    let cv = poly::compress_dv(v);
    out[cu.len()..].copy_from_slice(&cv);
    out
}

fn ct_decode(ct: &[u8; INDCPA_BYTES]) -> (PolyVec<Normal>, poly::Poly<Normal>) {
    let du_len = crate::params::POLYVECCOMPRESSEDBYTES;
    let mut ubytes = [0u8; crate::params::POLYVECCOMPRESSEDBYTES];
    ubytes.copy_from_slice(&ct[..du_len]);
    let u = polyvec::decompress_du(&ubytes);

    let mut vbytes = [0u8; crate::params::POLYCOMPRESSEDBYTES_DV];
    vbytes.copy_from_slice(&ct[du_len..]);
    let v = poly::decompress_dv(&vbytes);
    (u, v)
}

/// Deterministic CPA-PKE key generation from a 32-byte seed `d`.
pub fn keypair(d: &[u8; SYMBYTES]) -> ([u8; INDCPA_PUBLICKEYBYTES], [u8; INDCPA_SECRETKEYBYTES]) {
    let mut dk = [0u8; SYMBYTES + 1];
    dk[..SYMBYTES].copy_from_slice(d);
    dk[SYMBYTES] = K as u8; // domain separation, as in ML-KEM's G(d || k)
    let g = sha3_512(&dk);
    let mut rho = [0u8; SYMBYTES];
    let mut sigma = [0u8; SYMBYTES];
    rho.copy_from_slice(&g[..SYMBYTES]);
    sigma.copy_from_slice(&g[SYMBYTES..]);

    let a_hat = gen_matrix(&rho, false);

    let mut nonce = 0u8;
    let mut s = PolyVec::<Normal>::zero();
    for i in 0..K {
        s.polys[i] = crate::cbd::poly_getnoise(&sigma, nonce, ETA1);
        nonce += 1;
    }
    let mut e = PolyVec::<Normal>::zero();
    for i in 0..K {
        e.polys[i] = crate::cbd::poly_getnoise(&sigma, nonce, ETA1);
        nonce += 1;
    }

    let mut s_hat = polyvec::ntt(s);
    let mut e_hat = polyvec::ntt(e);

    let mut t_hat = PolyVec::<Ntt>::zero();
    for i in 0..K {
        let acc = polyvec::basemul_acc(&a_hat[i], &s_hat);
        // basemul's fqmul divides by R once; re-scale by R here so t_hat
        // comes out exact once it undergoes the *next* basemul (in encrypt)
        // against r_hat, which divides by R again.
        let acc_mont = poly::tomont(&acc);
        t_hat.polys[i] = poly::add(&acc_mont, &e_hat.polys[i]);
    }
    polyvec::reduce(&mut t_hat);

    let pk = pk_encode(&t_hat, &rho);
    let sk = polyvec::tobytes(&reinterpret_normal(&s_hat));

    e_hat.zeroize();
    s_hat.zeroize();
    sigma.zeroize();

    (pk, sk)
}

/// CPA-PKE encryption: `c = Enc(pk, m, coins)`.
pub fn encrypt(
    pk: &[u8; INDCPA_PUBLICKEYBYTES],
    m: &[u8; SYMBYTES],
    coins: &[u8; SYMBYTES],
) -> [u8; INDCPA_BYTES] {
    let (t_hat, rho) = pk_decode(pk);
    let a_hat_t = gen_matrix(&rho, true);

    let mut nonce = 0u8;
    let mut r = PolyVec::<Normal>::zero();
    for i in 0..K {
        r.polys[i] = crate::cbd::poly_getnoise(coins, nonce, ETA1);
        nonce += 1;
    }
    let mut e1 = PolyVec::<Normal>::zero();
    for i in 0..K {
        e1.polys[i] = crate::cbd::poly_getnoise(coins, nonce, ETA2);
        nonce += 1;
    }
    let e2 = crate::cbd::poly_getnoise(coins, nonce, ETA2);

    let r_hat = polyvec::ntt(r);

    let mut u = PolyVec::<Normal>::zero();
    for i in 0..K {
        let acc = polyvec::basemul_acc(&a_hat_t[i], &r_hat);
        u.polys[i] = poly::add(&poly::invntt(acc), &e1.polys[i]);
    }

    let vt_acc = polyvec::basemul_acc(&t_hat, &r_hat);
    let v_no_msg = poly::add(&poly::invntt(vt_acc), &e2);
    let k_poly = poly::frommsg(m);
    let v = poly::add(&v_no_msg, &k_poly);

    ct_encode(&u, &v)
}

/// CPA-PKE decryption: `m = Dec(sk, c)`.
pub fn decrypt(sk: &[u8; INDCPA_SECRETKEYBYTES], ct: &[u8; INDCPA_BYTES]) -> [u8; SYMBYTES] {
    let (u, v) = ct_decode(ct);

    let mut skbytes = [0u8; crate::params::POLYVECBYTES];
    skbytes.copy_from_slice(sk);
    let s_hat = reinterpret_ntt(&polyvec::frombytes(&skbytes));

    let u_hat = polyvec::ntt(u);
    let mp_hat = polyvec::basemul_acc(&s_hat, &u_hat);
    let mp = poly::invntt(mp_hat);

    let w = poly::sub(&v, &mp);
    poly::tomsg(&w)
}

/// `H(pk)`, used by the KEM layer to bind the FO hash to the public key.
pub fn hash_pk(pk: &[u8; INDCPA_PUBLICKEYBYTES]) -> [u8; SYMBYTES] {
    crate::shake::sha3_256(pk)
}
