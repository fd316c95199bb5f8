use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Role user, closed enum yang di-mapping ke postgres enum `user_role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Dealer,
    Vendor,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Dealer, Role::Vendor, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Dealer => "dealer",
            Role::Vendor => "vendor",
            Role::Admin => "admin",
        }
    }

    /// Dashboard route milik role ini
    pub fn home_route(&self) -> &'static str {
        match self {
            Role::Dealer => "/dealer",
            Role::Vendor => "/vendor",
            Role::Admin => "/admin",
        }
    }
}

// Implement Display untuk logging
impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Model profile dari database, id sama dengan identity id
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub role: Role,
    pub full_name: String,
    pub company_name: String,
    pub created_at: DateTime<Utc>,
}

// Response untuk GET /api/session
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub full_name: String,
    pub company_name: String,
    #[schema(example = "/dealer")]
    pub home_route: String,
}

impl SessionResponse {
    pub fn new(email: String, profile: Profile) -> Self {
        Self {
            user_id: profile.id,
            email,
            role: profile.role,
            full_name: profile.full_name,
            company_name: profile.company_name,
            home_route: profile.role.home_route().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_is_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Vendor).unwrap(), "\"vendor\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert!(serde_json::from_str::<Role>("\"superuser\"").is_err());
    }

    #[test]
    fn test_home_routes_are_distinct() {
        let routes: std::collections::HashSet<_> =
            Role::ALL.iter().map(|r| r.home_route()).collect();
        assert_eq!(routes.len(), Role::ALL.len());
    }

    #[test]
    fn test_session_response_uses_profile_role() {
        let profile = Profile {
            id: Uuid::new_v4(),
            role: Role::Vendor,
            full_name: "Vera Vendor".to_string(),
            company_name: "Print House".to_string(),
            created_at: Utc::now(),
        };
        let id = profile.id;

        let session = SessionResponse::new("vera@example.com".to_string(), profile);
        assert_eq!(session.user_id, id);
        assert_eq!(session.role, Role::Vendor);
        assert_eq!(session.home_route, "/vendor");
    }
}
