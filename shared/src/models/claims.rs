use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Model JWT claims dari identity provider.
///
/// Token hanya membawa identitas (`sub` = id profile). Role TIDAK dibaca dari
/// token, role selalu di-resolve dari tabel `profiles` di sisi server.
/// Expiry dicek oleh `jsonwebtoken::Validation` saat decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    pub token_type: String,
    pub jti: String,
}

impl TokenClaims {
    /// Hanya access token yang boleh dipakai di business endpoint
    pub fn is_access_token(&self) -> bool {
        self.token_type == "access"
    }
}
