//! Default values for parameters declared without one.

use rand::Rng;

use crate::error::InputError;
use crate::types::parameter::{ParameterKind, ParameterRecord};

/// Characters a generated secret is drawn from.
pub const ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Value given to a plain descriptor without `value`.
pub const PLAIN_DEFAULT: &str = "1";


/// Produce a value for `record`: random letters of `record.length` for a
/// secret, the fixed default for a plain parameter.
pub fn generate<R: Rng + ?Sized>(
    record: &ParameterRecord,
    rng: &mut R,
) -> Result<String, InputError> {
    match record.kind {
        ParameterKind::Secret => {
            let length = record.length_number()?;
            Ok(random_letters(length, rng))
        }
        ParameterKind::Plain => Ok(PLAIN_DEFAULT.to_string()),
    }
}

/// `n` characters drawn uniformly from `ALPHABET`.
pub fn random_letters<R: Rng + ?Sized>(n: usize, rng: &mut R) -> String {
    (0..n)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(kind: ParameterKind, length: &str) -> ParameterRecord {
        ParameterRecord {
            path: "/p".into(),
            kind,
            version: Some("1".into()),
            length: length.into(),
            value: String::new(),
        }
    }

    #[test]
    fn secret_has_requested_length_and_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        for length in [1usize, 8, 16, 20, 64] {
            let value = generate(&record(ParameterKind::Secret, &length.to_string()), &mut rng)
                .unwrap();
            assert_eq!(value.len(), length);
            assert!(value.bytes().all(|b| b.is_ascii_alphabetic()));
        }
    }

    #[test]
    fn same_seed_same_value() {
        let r = record(ParameterKind::Secret, "12");
        let a = generate(&r, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = generate(&r, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn plain_default_is_one() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(generate(&record(ParameterKind::Plain, "junk"), &mut rng).unwrap(), "1");
    }

    #[test]
    fn unparseable_length_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate(&record(ParameterKind::Secret, "twenty"), &mut rng).unwrap_err();
        assert!(matches!(err, InputError::InvalidLength { .. }));
    }

    #[test]
    fn huge_length_fails_before_allocating() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate(&record(ParameterKind::Secret, "999999999999"), &mut rng).unwrap_err();
        assert!(matches!(err, InputError::InvalidLength { .. }));
    }

    #[test]
    fn uses_both_cases() {
        let value = random_letters(2000, &mut StdRng::seed_from_u64(3));
        assert!(value.bytes().any(|b| b.is_ascii_lowercase()));
        assert!(value.bytes().any(|b| b.is_ascii_uppercase()));
    }
}
