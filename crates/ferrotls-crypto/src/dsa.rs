//! DSA signatures over externally supplied digests.
//!
//! Wire form is the DER `Dss-Sig-Value ::= SEQUENCE { r INTEGER, s INTEGER }`.
//! The minimal DER integer helpers below exist only for that value; this is
//! signature glue, not a general ASN.1 codec.

use std::fmt;

use ferrotls_types::CryptoError;

use crate::mpi::Mpi;

/// DSA public key: domain parameters (p, q, g) plus the public value y.
#[derive(Debug, Clone)]
pub struct DsaPublicKey {
    p: Mpi,
    q: Mpi,
    g: Mpi,
    y: Mpi,
}

impl DsaPublicKey {
    pub fn new(p: &[u8], q: &[u8], g: &[u8], y: &[u8]) -> Result<Self, CryptoError> {
        Self::from_parts(
            Mpi::from_bytes_be(p)?,
            Mpi::from_bytes_be(q)?,
            Mpi::from_bytes_be(g)?,
            Mpi::from_bytes_be(y)?,
        )
    }

    pub fn from_parts(p: Mpi, q: Mpi, g: Mpi, y: Mpi) -> Result<Self, CryptoError> {
        if p.is_zero() || p.is_even() || q.is_zero() || g.is_zero() || y.is_zero() {
            return Err(CryptoError::InvalidKey);
        }
        Ok(DsaPublicKey { p, q, g, y })
    }

    /// Verify a DER-encoded (r, s) signature over `digest`.
    pub fn verify(&self, digest: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let (r, s) = decode_dss_sig_value(signature)?;
        if r.is_zero() || r >= self.q || s.is_zero() || s >= self.q {
            return Err(CryptoError::DsaVerifyFail);
        }
        let h = Mpi::from_bytes_be(digest)?.mod_reduce(&self.q)?;

        // w = s^-1 mod q (q is prime, so Fermat applies)
        let w = s.mod_exp(&self.q.sub_u64(2)?, &self.q)?;
        let u1 = h.mul(&w).mod_reduce(&self.q)?;
        let u2 = r.mul(&w).mod_reduce(&self.q)?;
        let v = self
            .g
            .mod_exp(&u1, &self.p)?
            .mul(&self.y.mod_exp(&u2, &self.p)?)
            .mod_reduce(&self.p)?
            .mod_reduce(&self.q)?;

        if v == r {
            Ok(())
        } else {
            Err(CryptoError::DsaVerifyFail)
        }
    }
}

/// DSA private key. The public value y is derived from x at construction.
#[derive(Clone)]
pub struct DsaPrivateKey {
    public: DsaPublicKey,
    x: Mpi,
}

impl fmt::Debug for DsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DsaPrivateKey")
            .field("public", &self.public)
            .field("x", &"<redacted>")
            .finish()
    }
}

impl DsaPrivateKey {
    pub fn new(p: &[u8], q: &[u8], g: &[u8], x: &[u8]) -> Result<Self, CryptoError> {
        let p = Mpi::from_bytes_be(p)?;
        let q = Mpi::from_bytes_be(q)?;
        let g = Mpi::from_bytes_be(g)?;
        let x = Mpi::from_bytes_be(x)?;
        if x.is_zero() || x >= q {
            return Err(CryptoError::InvalidKey);
        }
        let y = g.mod_exp(&x, &p)?;
        Ok(DsaPrivateKey {
            public: DsaPublicKey::from_parts(p, q, g, y)?,
            x,
        })
    }

    pub fn public_key(&self) -> &DsaPublicKey {
        &self.public
    }

    /// Sign `digest`, returning the DER-encoded (r, s) value.
    pub fn sign(&self, digest: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let p = &self.public.p;
        let q = &self.public.q;
        let g = &self.public.g;
        let h = Mpi::from_bytes_be(digest)?.mod_reduce(q)?;

        loop {
            let k = Mpi::random_below(q)?;
            if k.is_zero() {
                continue;
            }
            let r = g.mod_exp(&k, p)?.mod_reduce(q)?;
            if r.is_zero() {
                continue;
            }
            let k_inv = k.mod_exp(&q.sub_u64(2)?, q)?;
            let s = k_inv
                .mul(&h.add(&self.x.mul(&r)))
                .mod_reduce(q)?;
            if s.is_zero() {
                continue;
            }
            return Ok(encode_dss_sig_value(&r, &s));
        }
    }
}

fn encode_der_integer(out: &mut Vec<u8>, value: &Mpi) {
    let mut bytes = value.to_bytes_be();
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0x00);
    }
    out.push(0x02);
    out.push(bytes.len() as u8);
    out.extend_from_slice(&bytes);
}

fn encode_dss_sig_value(r: &Mpi, s: &Mpi) -> Vec<u8> {
    let mut body = Vec::new();
    encode_der_integer(&mut body, r);
    encode_der_integer(&mut body, s);
    let mut out = Vec::with_capacity(body.len() + 3);
    out.push(0x30);
    if body.len() > 127 {
        out.push(0x81);
    }
    out.push(body.len() as u8);
    out.extend_from_slice(&body);
    out
}

fn decode_der_integer<'a>(data: &'a [u8]) -> Result<(Mpi, &'a [u8]), CryptoError> {
    if data.len() < 2 || data[0] != 0x02 {
        return Err(CryptoError::DsaInvalidSigData);
    }
    let len = data[1] as usize;
    if len == 0 || len > 127 || data.len() < 2 + len {
        return Err(CryptoError::DsaInvalidSigData);
    }
    let mut bytes = &data[2..2 + len];
    while bytes.len() > 1 && bytes[0] == 0 {
        bytes = &bytes[1..];
    }
    Ok((Mpi::from_bytes_be(bytes)?, &data[2 + len..]))
}

fn decode_dss_sig_value(data: &[u8]) -> Result<(Mpi, Mpi), CryptoError> {
    if data.len() < 2 || data[0] != 0x30 {
        return Err(CryptoError::DsaInvalidSigData);
    }
    let (body_len, body_start) = if data[1] == 0x81 {
        if data.len() < 3 {
            return Err(CryptoError::DsaInvalidSigData);
        }
        (data[2] as usize, 3)
    } else {
        (data[1] as usize, 2)
    };
    if data.len() != body_start + body_len {
        return Err(CryptoError::DsaInvalidSigData);
    }
    let (r, rest) = decode_der_integer(&data[body_start..])?;
    let (s, rest) = decode_der_integer(rest)?;
    if !rest.is_empty() {
        return Err(CryptoError::DsaInvalidSigData);
    }
    Ok((r, s))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Fixed 1024/160 domain parameters and keypair.
    const P: &str = "ea13084add92d9d3a6092aba7a6e268d4dac3f6aa892cf2edcf792c63a5c35ec\
                     4315b1d4a0fedfdba011f80a7f12f6fc8716d76985966df55d774da15d515865\
                     9376e71c97731674e6ee565a018ab6a617cd8079d81b911ad6e1c8e823d2511c\
                     386050f435d4abea42c41defd1f6c4db269e4bb28f2a295de11ec0d5edf40989";
    const Q: &str = "fac3922b469987f7b22d24b7f75709994cc64ae3";
    const G: &str = "b414debed14ec9ecfe801f5185b465df7dc9bfe044390dcf0f37c32b0f1285e4\
                     98ca79f7a05ce0e244b0ca68247c76e82c3f2b36e705883bebf84b830374666a\
                     99ad40500320872c99c46ebeb6f1a2bd55d48dc91d9a217082c832e5dfec6884\
                     c7e1635453d3e32e5140f4b52de23c9244a263bb86749bf86e09174751e50f6e";
    const X: &str = "53d2e6d698a36bd458a32c3781a15087b77fa2a6";
    const Y: &str = "a040f4e46e8a4d9edd03ef12a5d9b5a707f61bd2b40aebf49045ac18cc1370c0\
                     23d29310333b182a5917b9ab9c3dc6c090663225bc579edaa98d6d98d305522b\
                     1a9cabbabae3769a56bd8bbbfa215f93d0375bd02a5bc8d8b5d4add9b6dfce8f\
                     944134f203c251e6b4fb10e3db57b8987f0a1cff0819747e8e7ccd769a8da0bd";

    fn test_key() -> DsaPrivateKey {
        DsaPrivateKey::new(
            &hex::decode(P).unwrap(),
            &hex::decode(Q).unwrap(),
            &hex::decode(G).unwrap(),
            &hex::decode(X).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_derived_public_value_matches_fixture() {
        let key = test_key();
        let y = hex::decode(Y).unwrap();
        assert_eq!(
            key.public_key().y.to_bytes_be(),
            Mpi::from_bytes_be(&y).unwrap().to_bytes_be()
        );
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let key = test_key();
        let digest = [0x11u8; 20];
        let sig = key.sign(&digest).unwrap();
        key.public_key().verify(&digest, &sig).unwrap();
    }

    #[test]
    fn test_verify_rejects_wrong_digest() {
        let key = test_key();
        let sig = key.sign(&[0x11u8; 20]).unwrap();
        assert_eq!(
            key.public_key().verify(&[0x12u8; 20], &sig).unwrap_err(),
            CryptoError::DsaVerifyFail
        );
    }

    #[test]
    fn test_verify_known_answer() {
        // (r, s) computed independently for SHA-1("dss params").
        let key = test_key();
        let digest = hex::decode("a7330f4182a45ac3e5b4386b06f17a7aef8fa253").unwrap();
        let r = hex::decode("5d925527f9df8084447a0635776af16f6b44f021").unwrap();
        let s = hex::decode("517859cb091048af3a1354361cd84e3c43272f5c").unwrap();
        let sig = encode_dss_sig_value(
            &Mpi::from_bytes_be(&r).unwrap(),
            &Mpi::from_bytes_be(&s).unwrap(),
        );
        key.public_key().verify(&digest, &sig).unwrap();
    }

    #[test]
    fn test_debug_redacts_private_value() {
        let key = test_key();
        let rendered = format!("{:?}", key);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(&format!("{:?}", key.x)));
    }

    #[test]
    fn test_decode_rejects_trailing_garbage() {
        let key = test_key();
        let mut sig = key.sign(&[0x22u8; 20]).unwrap();
        sig.push(0x00);
        assert_eq!(
            key.public_key().verify(&[0x22u8; 20], &sig).unwrap_err(),
            CryptoError::DsaInvalidSigData
        );
    }
}
