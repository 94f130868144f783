use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity fields carried by a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub username: String,
    pub role_id: Uuid,
    pub iss: String,
    pub iat: usize,
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_wire_format() {
        let claims = Claims {
            user_id: Uuid::from_u128(1),
            username: "mbeki".to_string(),
            role_id: Uuid::from_u128(2),
            iss: "rollbook".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_086_400,
        };

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["user_id"], "00000000-0000-0000-0000-000000000001");
        assert_eq!(value["role_id"], "00000000-0000-0000-0000-000000000002");
        assert_eq!(value["iss"], "rollbook");
        assert_eq!(value["exp"], 1_700_086_400);

        let back: Claims = serde_json::from_value(value).unwrap();
        assert_eq!(back, claims);
    }
}
