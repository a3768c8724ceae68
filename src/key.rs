//! Key material handling.
//!
//! Callers may supply keys as raw bytes, PEM/DER text, or already-parsed
//! handles. All forms are normalized to one of the canonical handle types
//! ([`SecretKey`], [`PrivateKey`], [`PublicKey`]) before any cryptographic
//! work happens, so the signature backends only ever see canonical keys.

use core::fmt;

use p256::ecdsa::{SigningKey as P256SigningKey, VerifyingKey as P256VerifyingKey};
use p384::ecdsa::{SigningKey as P384SigningKey, VerifyingKey as P384VerifyingKey};
use p521::ecdsa::{SigningKey as P521SigningKey, VerifyingKey as P521VerifyingKey};
use pkcs8::der::{asn1::ObjectIdentifier, Document};
use pkcs8::{spki::SubjectPublicKeyInfoRef, PrivateKeyInfo};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::SjwtError;

/// `id-RSASSA-PSS` algorithm identifier. Keys carrying it are restricted to
/// PSS signatures.
const RSASSA_PSS_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.10");

const INVALID_PRIVATE_KEY_MATERIAL: &str =
    "\"privateKey\" is not a valid key material for asymmetric algorithms";
const INVALID_PUBLIC_KEY_MATERIAL: &str =
    "\"publicKey\" is not a valid key material for asymmetric algorithms";

/// Secret key for the HMAC algorithm family. Zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Creates a key from the specified `bytes`. Any key length is accepted.
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self(bytes.as_ref().to_vec())
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("SecretKey").field(&"_").finish()
    }
}

impl AsRef<[u8]> for SecretKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for SecretKey {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl From<String> for SecretKey {
    fn from(text: String) -> Self {
        Self(text.into_bytes())
    }
}

impl From<&[u8]> for SecretKey {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for SecretKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Kind of an asymmetric key, as used for algorithm allow-list inference
/// and compatibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsymmetricKeyType {
    /// RSA key usable with PKCS#1 v1.5 signatures.
    Rsa,
    /// RSA key restricted to PSS signatures (`id-RSASSA-PSS`).
    RsaPss,
    /// Elliptic-curve key.
    Ec,
}

impl fmt::Display for AsymmetricKeyType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Rsa => "rsa",
            Self::RsaPss => "rsa-pss",
            Self::Ec => "ec",
        })
    }
}

/// Private key for the asymmetric algorithm families.
#[derive(Clone)]
pub enum PrivateKey {
    /// RSA private key (`rsaEncryption`).
    Rsa(RsaPrivateKey),
    /// RSA private key declared as `id-RSASSA-PSS`.
    RsaPss(RsaPrivateKey),
    /// P-256 private key for `ES256`.
    P256(P256SigningKey),
    /// P-384 private key for `ES384`.
    P384(P384SigningKey),
    /// P-521 private key for `ES512`.
    P521(P521SigningKey),
}

impl PrivateKey {
    /// Parses a private key from PEM text. Supported encodings are PKCS#8
    /// (`PRIVATE KEY`, including RSA-PSS-typed keys) and PKCS#1
    /// (`RSA PRIVATE KEY`).
    pub fn from_pem(text: &str) -> Result<Self, SjwtError> {
        parse_private_pem(text).map_err(|_| SjwtError::validation(INVALID_PRIVATE_KEY_MATERIAL))
    }

    /// Parses a private key from DER bytes (PKCS#8 or PKCS#1).
    pub fn from_der(bytes: &[u8]) -> Result<Self, SjwtError> {
        parse_private_der(bytes).map_err(|_| SjwtError::validation(INVALID_PRIVATE_KEY_MATERIAL))
    }

    /// Wraps an RSA private key as an RSA-PSS-typed handle, restricting it
    /// to `PS*` signatures.
    pub fn rsa_pss(key: RsaPrivateKey) -> Self {
        Self::RsaPss(key)
    }

    /// Returns the asymmetric key type of this key.
    pub fn asymmetric_key_type(&self) -> AsymmetricKeyType {
        match self {
            Self::Rsa(_) => AsymmetricKeyType::Rsa,
            Self::RsaPss(_) => AsymmetricKeyType::RsaPss,
            Self::P256(_) | Self::P384(_) | Self::P521(_) => AsymmetricKeyType::Ec,
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PrivateKey")
            .field("type", &self.asymmetric_key_type())
            .finish_non_exhaustive()
    }
}

impl From<RsaPrivateKey> for PrivateKey {
    fn from(key: RsaPrivateKey) -> Self {
        Self::Rsa(key)
    }
}

impl From<P256SigningKey> for PrivateKey {
    fn from(key: P256SigningKey) -> Self {
        Self::P256(key)
    }
}

impl From<P384SigningKey> for PrivateKey {
    fn from(key: P384SigningKey) -> Self {
        Self::P384(key)
    }
}

impl From<P521SigningKey> for PrivateKey {
    fn from(key: P521SigningKey) -> Self {
        Self::P521(key)
    }
}

/// Public key for the asymmetric algorithm families.
#[derive(Clone)]
pub enum PublicKey {
    /// RSA public key (`rsaEncryption`).
    Rsa(RsaPublicKey),
    /// RSA public key declared as `id-RSASSA-PSS`.
    RsaPss(RsaPublicKey),
    /// P-256 public key for `ES256`.
    P256(P256VerifyingKey),
    /// P-384 public key for `ES384`.
    P384(P384VerifyingKey),
    /// P-521 public key for `ES512`.
    P521(P521VerifyingKey),
}

impl PublicKey {
    /// Parses a public key from PEM text. Supported encodings are SPKI
    /// (`PUBLIC KEY`, including RSA-PSS-typed keys) and PKCS#1
    /// (`RSA PUBLIC KEY`).
    pub fn from_pem(text: &str) -> Result<Self, SjwtError> {
        parse_public_pem(text).map_err(|_| SjwtError::validation(INVALID_PUBLIC_KEY_MATERIAL))
    }

    /// Parses a public key from DER bytes (SPKI or PKCS#1).
    pub fn from_der(bytes: &[u8]) -> Result<Self, SjwtError> {
        parse_public_der(bytes).map_err(|_| SjwtError::validation(INVALID_PUBLIC_KEY_MATERIAL))
    }

    /// Wraps an RSA public key as an RSA-PSS-typed handle, restricting it
    /// to `PS*` signatures.
    pub fn rsa_pss(key: RsaPublicKey) -> Self {
        Self::RsaPss(key)
    }

    /// Returns the asymmetric key type of this key.
    pub fn asymmetric_key_type(&self) -> AsymmetricKeyType {
        match self {
            Self::Rsa(_) => AsymmetricKeyType::Rsa,
            Self::RsaPss(_) => AsymmetricKeyType::RsaPss,
            Self::P256(_) | Self::P384(_) | Self::P521(_) => AsymmetricKeyType::Ec,
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PublicKey")
            .field("type", &self.asymmetric_key_type())
            .finish_non_exhaustive()
    }
}

impl From<RsaPublicKey> for PublicKey {
    fn from(key: RsaPublicKey) -> Self {
        Self::Rsa(key)
    }
}

impl From<P256VerifyingKey> for PublicKey {
    fn from(key: P256VerifyingKey) -> Self {
        Self::P256(key)
    }
}

impl From<P384VerifyingKey> for PublicKey {
    fn from(key: P384VerifyingKey) -> Self {
        Self::P384(key)
    }
}

impl From<P521VerifyingKey> for PublicKey {
    fn from(key: P521VerifyingKey) -> Self {
        Self::P521(key)
    }
}

/// Private key material as supplied by the caller: encoded bytes (PEM or
/// DER) or an already-parsed handle.
#[derive(Clone)]
pub enum PrivateKeyMaterial {
    /// PEM text or DER bytes, parsed during options validation.
    Encoded(Vec<u8>),
    /// Canonical key handle.
    Key(PrivateKey),
}

impl PrivateKeyMaterial {
    pub(crate) fn resolve(&self) -> Result<PrivateKey, SjwtError> {
        match self {
            Self::Key(key) => Ok(key.clone()),
            Self::Encoded(bytes) => {
                if let Ok(text) = core::str::from_utf8(bytes) {
                    if let Ok(key) = parse_private_pem(text) {
                        return Ok(key);
                    }
                }
                PrivateKey::from_der(bytes)
            }
        }
    }
}

impl From<&str> for PrivateKeyMaterial {
    fn from(text: &str) -> Self {
        Self::Encoded(text.as_bytes().to_vec())
    }
}

impl From<String> for PrivateKeyMaterial {
    fn from(text: String) -> Self {
        Self::Encoded(text.into_bytes())
    }
}

impl From<&[u8]> for PrivateKeyMaterial {
    fn from(bytes: &[u8]) -> Self {
        Self::Encoded(bytes.to_vec())
    }
}

impl From<Vec<u8>> for PrivateKeyMaterial {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Encoded(bytes)
    }
}

impl From<PrivateKey> for PrivateKeyMaterial {
    fn from(key: PrivateKey) -> Self {
        Self::Key(key)
    }
}

impl fmt::Debug for PrivateKeyMaterial {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoded(bytes) => formatter
                .debug_struct("Encoded")
                .field("len", &bytes.len())
                .finish(),
            Self::Key(key) => key.fmt(formatter),
        }
    }
}

/// Public key material as supplied by the caller: encoded bytes (PEM or
/// DER) or an already-parsed handle.
#[derive(Debug, Clone)]
pub enum PublicKeyMaterial {
    /// PEM text or DER bytes, parsed during options validation.
    Encoded(Vec<u8>),
    /// Canonical key handle.
    Key(PublicKey),
}

impl PublicKeyMaterial {
    pub(crate) fn resolve(&self) -> Result<PublicKey, SjwtError> {
        match self {
            Self::Key(key) => Ok(key.clone()),
            Self::Encoded(bytes) => {
                if let Ok(text) = core::str::from_utf8(bytes) {
                    if let Ok(key) = parse_public_pem(text) {
                        return Ok(key);
                    }
                }
                PublicKey::from_der(bytes)
            }
        }
    }
}

impl From<&str> for PublicKeyMaterial {
    fn from(text: &str) -> Self {
        Self::Encoded(text.as_bytes().to_vec())
    }
}

impl From<String> for PublicKeyMaterial {
    fn from(text: String) -> Self {
        Self::Encoded(text.into_bytes())
    }
}

impl From<&[u8]> for PublicKeyMaterial {
    fn from(bytes: &[u8]) -> Self {
        Self::Encoded(bytes.to_vec())
    }
}

impl From<Vec<u8>> for PublicKeyMaterial {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Encoded(bytes)
    }
}

impl From<PublicKey> for PublicKeyMaterial {
    fn from(key: PublicKey) -> Self {
        Self::Key(key)
    }
}

/// Canonical signing key, produced by generate-options validation.
#[derive(Debug, Clone)]
pub(crate) enum SecretOrPrivateKey {
    Secret(SecretKey),
    Private(PrivateKey),
}

/// Canonical verification key, produced by verify-options validation.
#[derive(Debug, Clone)]
pub(crate) enum SecretOrPublicKey {
    Secret(SecretKey),
    Public(PublicKey),
}

fn parse_private_pem(text: &str) -> anyhow::Result<PrivateKey> {
    let text = text.trim();
    if let Ok(key) = RsaPrivateKey::from_pkcs8_pem(text) {
        return Ok(PrivateKey::Rsa(key));
    }
    if let Ok(key) = RsaPrivateKey::from_pkcs1_pem(text) {
        return Ok(PrivateKey::Rsa(key));
    }
    if let Ok((label, document)) = Document::from_pem(text) {
        if label == "PRIVATE KEY" {
            if let Ok(key) = pss_private_from_der(document.as_bytes()) {
                return Ok(PrivateKey::RsaPss(key));
            }
        }
    }
    if let Ok(key) = P256SigningKey::from_pkcs8_pem(text) {
        return Ok(PrivateKey::P256(key));
    }
    if let Ok(key) = P384SigningKey::from_pkcs8_pem(text) {
        return Ok(PrivateKey::P384(key));
    }
    if let Ok(key) = P521SigningKey::from_pkcs8_pem(text) {
        return Ok(PrivateKey::P521(key));
    }
    anyhow::bail!("unsupported private key encoding")
}

fn parse_private_der(bytes: &[u8]) -> anyhow::Result<PrivateKey> {
    if let Ok(key) = RsaPrivateKey::from_pkcs8_der(bytes) {
        return Ok(PrivateKey::Rsa(key));
    }
    if let Ok(key) = RsaPrivateKey::from_pkcs1_der(bytes) {
        return Ok(PrivateKey::Rsa(key));
    }
    if let Ok(key) = pss_private_from_der(bytes) {
        return Ok(PrivateKey::RsaPss(key));
    }
    if let Ok(key) = P256SigningKey::from_pkcs8_der(bytes) {
        return Ok(PrivateKey::P256(key));
    }
    if let Ok(key) = P384SigningKey::from_pkcs8_der(bytes) {
        return Ok(PrivateKey::P384(key));
    }
    if let Ok(key) = P521SigningKey::from_pkcs8_der(bytes) {
        return Ok(PrivateKey::P521(key));
    }
    anyhow::bail!("unsupported private key encoding")
}

/// Extracts the PKCS#1 key from a PKCS#8 document declared as
/// `id-RSASSA-PSS`.
fn pss_private_from_der(bytes: &[u8]) -> anyhow::Result<RsaPrivateKey> {
    let info = PrivateKeyInfo::try_from(bytes)?;
    anyhow::ensure!(
        info.algorithm.oid == RSASSA_PSS_OID,
        "not an RSA-PSS private key"
    );
    Ok(RsaPrivateKey::from_pkcs1_der(info.private_key)?)
}

fn parse_public_pem(text: &str) -> anyhow::Result<PublicKey> {
    let text = text.trim();
    if let Ok(key) = RsaPublicKey::from_public_key_pem(text) {
        return Ok(PublicKey::Rsa(key));
    }
    if let Ok(key) = RsaPublicKey::from_pkcs1_pem(text) {
        return Ok(PublicKey::Rsa(key));
    }
    if let Ok((label, document)) = Document::from_pem(text) {
        if label == "PUBLIC KEY" {
            if let Ok(key) = pss_public_from_der(document.as_bytes()) {
                return Ok(PublicKey::RsaPss(key));
            }
        }
    }
    if let Ok(key) = P256VerifyingKey::from_public_key_pem(text) {
        return Ok(PublicKey::P256(key));
    }
    if let Ok(key) = P384VerifyingKey::from_public_key_pem(text) {
        return Ok(PublicKey::P384(key));
    }
    if let Ok(key) = P521VerifyingKey::from_public_key_pem(text) {
        return Ok(PublicKey::P521(key));
    }
    anyhow::bail!("unsupported public key encoding")
}

fn parse_public_der(bytes: &[u8]) -> anyhow::Result<PublicKey> {
    if let Ok(key) = RsaPublicKey::from_public_key_der(bytes) {
        return Ok(PublicKey::Rsa(key));
    }
    if let Ok(key) = RsaPublicKey::from_pkcs1_der(bytes) {
        return Ok(PublicKey::Rsa(key));
    }
    if let Ok(key) = pss_public_from_der(bytes) {
        return Ok(PublicKey::RsaPss(key));
    }
    if let Ok(key) = P256VerifyingKey::from_public_key_der(bytes) {
        return Ok(PublicKey::P256(key));
    }
    if let Ok(key) = P384VerifyingKey::from_public_key_der(bytes) {
        return Ok(PublicKey::P384(key));
    }
    if let Ok(key) = P521VerifyingKey::from_public_key_der(bytes) {
        return Ok(PublicKey::P521(key));
    }
    anyhow::bail!("unsupported public key encoding")
}

/// Extracts the PKCS#1 key from an SPKI document declared as
/// `id-RSASSA-PSS`.
fn pss_public_from_der(bytes: &[u8]) -> anyhow::Result<RsaPublicKey> {
    let info = SubjectPublicKeyInfoRef::try_from(bytes)?;
    anyhow::ensure!(
        info.algorithm.oid == RSASSA_PSS_OID,
        "not an RSA-PSS public key"
    );
    Ok(RsaPublicKey::from_pkcs1_der(info.subject_public_key.raw_bytes())?)
}
