//! Token signature algorithm identifiers.

use core::fmt;

/// JWT signature algorithm, as recorded in the `alg` header field.
///
/// Twelve algorithms are supported: the four families of
/// [`AlgorithmFamily`], each with a 256-, 384- and 512-bit SHA-2 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// HMAC with SHA-256.
    Hs256,
    /// HMAC with SHA-384.
    Hs384,
    /// HMAC with SHA-512.
    Hs512,
    /// RSA with PKCS#1 v1.5 padding and SHA-256.
    Rs256,
    /// RSA with PKCS#1 v1.5 padding and SHA-384.
    Rs384,
    /// RSA with PKCS#1 v1.5 padding and SHA-512.
    Rs512,
    /// ECDSA on the P-256 curve with SHA-256.
    Es256,
    /// ECDSA on the P-384 curve with SHA-384.
    Es384,
    /// ECDSA on the P-521 curve with SHA-512.
    Es512,
    /// RSA with PSS padding and SHA-256.
    Ps256,
    /// RSA with PSS padding and SHA-384.
    Ps384,
    /// RSA with PSS padding and SHA-512.
    Ps512,
}

/// Family an [`Algorithm`] belongs to. Each algorithm belongs to exactly
/// one family, which determines the kind of key it works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// Symmetric keyed-hash algorithms (`HS*`).
    Hmac,
    /// RSA signatures with PKCS#1 v1.5 padding (`RS*`).
    Rsa,
    /// RSA signatures with PSS padding (`PS*`).
    RsaPss,
    /// Elliptic-curve signatures (`ES*`).
    Ecdsa,
}

/// SHA-2 digest size used by an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DigestSize {
    Bits256,
    Bits384,
    Bits512,
}

impl Algorithm {
    /// All supported algorithms, in the canonical listing order.
    pub const ALL: [Self; 12] = [
        Self::Hs256,
        Self::Hs384,
        Self::Hs512,
        Self::Rs256,
        Self::Rs384,
        Self::Rs512,
        Self::Es256,
        Self::Es384,
        Self::Es512,
        Self::Ps256,
        Self::Ps384,
        Self::Ps512,
    ];

    const HMAC: [Self; 3] = [Self::Hs256, Self::Hs384, Self::Hs512];
    const RSA: [Self; 3] = [Self::Rs256, Self::Rs384, Self::Rs512];
    const RSA_PSS: [Self; 3] = [Self::Ps256, Self::Ps384, Self::Ps512];
    const ECDSA: [Self; 3] = [Self::Es256, Self::Es384, Self::Es512];

    /// Returns the name of this algorithm as recorded in the `alg` header
    /// field.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hs256 => "HS256",
            Self::Hs384 => "HS384",
            Self::Hs512 => "HS512",
            Self::Rs256 => "RS256",
            Self::Rs384 => "RS384",
            Self::Rs512 => "RS512",
            Self::Es256 => "ES256",
            Self::Es384 => "ES384",
            Self::Es512 => "ES512",
            Self::Ps256 => "PS256",
            Self::Ps384 => "PS384",
            Self::Ps512 => "PS512",
        }
    }

    /// Looks an algorithm up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name().eq_ignore_ascii_case(name))
    }

    /// Returns the family this algorithm belongs to.
    pub fn family(self) -> AlgorithmFamily {
        match self {
            Self::Hs256 | Self::Hs384 | Self::Hs512 => AlgorithmFamily::Hmac,
            Self::Rs256 | Self::Rs384 | Self::Rs512 => AlgorithmFamily::Rsa,
            Self::Ps256 | Self::Ps384 | Self::Ps512 => AlgorithmFamily::RsaPss,
            Self::Es256 | Self::Es384 | Self::Es512 => AlgorithmFamily::Ecdsa,
        }
    }

    pub(crate) fn digest_size(self) -> DigestSize {
        match self {
            Self::Hs256 | Self::Rs256 | Self::Es256 | Self::Ps256 => DigestSize::Bits256,
            Self::Hs384 | Self::Rs384 | Self::Es384 | Self::Ps384 => DigestSize::Bits384,
            Self::Hs512 | Self::Rs512 | Self::Es512 | Self::Ps512 => DigestSize::Bits512,
        }
    }
}

impl AlgorithmFamily {
    /// Returns the algorithms belonging to this family.
    pub fn algorithms(self) -> &'static [Algorithm] {
        match self {
            Self::Hmac => &Algorithm::HMAC,
            Self::Rsa => &Algorithm::RSA,
            Self::RsaPss => &Algorithm::RSA_PSS,
            Self::Ecdsa => &Algorithm::ECDSA,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Formats a list of algorithms as `HS256, HS384, HS512` for error messages.
pub(crate) fn algorithm_list(algorithms: &[Algorithm]) -> String {
    let names: Vec<_> = algorithms.iter().map(|alg| alg.name()).collect();
    names.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for alg in Algorithm::ALL {
            assert_eq!(Algorithm::from_name(alg.name()), Some(alg));
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(Algorithm::from_name("hs256"), Some(Algorithm::Hs256));
        assert_eq!(Algorithm::from_name("pS512"), Some(Algorithm::Ps512));
        assert_eq!(Algorithm::from_name("none"), None);
        assert_eq!(Algorithm::from_name("HS128"), None);
    }

    #[test]
    fn every_algorithm_has_one_family() {
        for alg in Algorithm::ALL {
            let families = [
                AlgorithmFamily::Hmac,
                AlgorithmFamily::Rsa,
                AlgorithmFamily::RsaPss,
                AlgorithmFamily::Ecdsa,
            ];
            let matches = families
                .into_iter()
                .filter(|family| family.algorithms().contains(&alg))
                .count();
            assert_eq!(matches, 1, "{alg} must belong to exactly one family");
        }
    }

    #[test]
    fn list_formatting() {
        assert_eq!(
            algorithm_list(AlgorithmFamily::Hmac.algorithms()),
            "HS256, HS384, HS512"
        );
    }
}
