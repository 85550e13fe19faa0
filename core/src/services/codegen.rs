//! Collision-free code generation.
//!
//! Draws candidates from the OS CSPRNG and consults a caller-supplied
//! uniqueness check against the relevant persisted collection. Retries are
//! bounded: numeric kinds fall back to a wider code space before giving
//! up, so adversarial collision pressure cannot spin the loop forever.
//! The caller persists the accepted value atomically with the record it
//! identifies.

use std::future::Future;

use rand::{rngs::OsRng, RngCore};

use crate::errors::{DomainError, DomainResult};

/// Draws attempted per code width before widening or failing
const MAX_DRAWS_PER_WIDTH: u32 = 8;

/// The kinds of identifier the generator produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    /// 6-digit buyer verification code; unique among a sale's live codes
    Verification,
    /// 6-digit sale access code; unique across all sales
    AccessCode,
    /// 128-bit opaque token, hex-encoded; unique across all sales
    QrToken,
}

impl CodeKind {
    /// Digit widths to try in order; the last is the widened fallback.
    /// QR tokens have no fallback: 128 bits never collides in practice,
    /// the check is a safety net.
    fn digit_widths(&self) -> &'static [u32] {
        match self {
            Self::Verification | Self::AccessCode => &[6, 8],
            Self::QrToken => &[0],
        }
    }
}

/// Generator for verification codes, access codes, and QR tokens
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    max_draws_per_width: u32,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            max_draws_per_width: MAX_DRAWS_PER_WIDTH,
        }
    }
}

impl CodeGenerator {
    pub fn new(max_draws_per_width: u32) -> Self {
        Self {
            max_draws_per_width: max_draws_per_width.max(1),
        }
    }

    /// Generate a code of the given kind that passes the uniqueness check.
    ///
    /// `is_taken` is called with each candidate and returns whether the
    /// value already exists in the collection the code must be unique in.
    pub async fn generate<F, Fut>(&self, kind: CodeKind, mut is_taken: F) -> DomainResult<String>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = DomainResult<bool>>,
    {
        for &width in kind.digit_widths() {
            for _ in 0..self.max_draws_per_width {
                let candidate = Self::draw(kind, width);
                if !is_taken(candidate.clone()).await? {
                    return Ok(candidate);
                }
                tracing::debug!(
                    kind = ?kind,
                    width = width,
                    event = "code_collision",
                    "Generated code collided, redrawing"
                );
            }
            tracing::warn!(
                kind = ?kind,
                width = width,
                event = "code_space_pressure",
                "Exhausted draws at current width"
            );
        }

        Err(DomainError::Internal {
            message: format!("Unable to generate a unique {:?} code", kind),
        })
    }

    /// Draw one candidate from the OS CSPRNG
    fn draw(kind: CodeKind, digit_width: u32) -> String {
        let mut rng = OsRng;
        match kind {
            CodeKind::Verification | CodeKind::AccessCode => {
                let mut bytes = [0u8; 8];
                rng.fill_bytes(&mut bytes);
                let num = u64::from_le_bytes(bytes);
                // Modulo bias is negligible at these widths
                let modulus = 10u64.pow(digit_width);
                format!("{:0width$}", num % modulus, width = digit_width as usize)
            }
            CodeKind::QrToken => {
                let mut bytes = [0u8; 16];
                rng.fill_bytes(&mut bytes);
                hex::encode(bytes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verification_code_format() {
        let generator = CodeGenerator::default();
        for _ in 0..50 {
            let code = generator
                .generate(CodeKind::Verification, |_| async { Ok(false) })
                .await
                .unwrap();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn test_qr_token_format() {
        let generator = CodeGenerator::default();
        let token = generator
            .generate(CodeKind::QrToken, |_| async { Ok(false) })
            .await
            .unwrap();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_collision_redraw() {
        let generator = CodeGenerator::default();
        let mut calls = 0;
        let code = generator
            .generate(CodeKind::AccessCode, |_| {
                calls += 1;
                let taken = calls <= 2;
                async move { Ok(taken) }
            })
            .await
            .unwrap();
        assert_eq!(calls, 3);
        assert_eq!(code.len(), 6);
    }

    #[tokio::test]
    async fn test_widens_under_collision_pressure() {
        let generator = CodeGenerator::default();
        // Every 6-digit candidate is taken; the generator must escape to
        // the wider space instead of looping.
        let code = generator
            .generate(CodeKind::AccessCode, |candidate| {
                let taken = candidate.len() == 6;
                async move { Ok(taken) }
            })
            .await
            .unwrap();
        assert_eq!(code.len(), 8);
    }

    #[tokio::test]
    async fn test_fails_when_space_exhausted() {
        let generator = CodeGenerator::new(2);
        let result = generator
            .generate(CodeKind::Verification, |_| async { Ok(true) })
            .await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::Internal { .. }
        ));
    }

    #[tokio::test]
    async fn test_lookup_errors_propagate() {
        let generator = CodeGenerator::default();
        let result = generator
            .generate(CodeKind::Verification, |_| async {
                Err(DomainError::Internal {
                    message: "store down".to_string(),
                })
            })
            .await;
        assert!(result.is_err());
    }
}
