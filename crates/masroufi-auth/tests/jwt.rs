use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use uuid::Uuid;

use masroufi_auth::error::AuthError;
use masroufi_auth::jwt::validate_token;

const SECRET: &str = "super-secret-jwt-token-with-at-least-32-characters";

fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn token(claims: serde_json::Value, secret: &str) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[test]
fn valid_token_yields_claims() {
    let user = Uuid::new_v4();
    let t = token(
        json!({
            "sub": user.to_string(),
            "exp": now() + 3600,
            "aud": "authenticated",
            "role": "authenticated",
            "email": "amina@example.com"
        }),
        SECRET,
    );

    let claims = validate_token(&t, SECRET).unwrap();

    assert_eq!(claims.user_id().unwrap(), user);
    assert_eq!(claims.email.as_deref(), Some("amina@example.com"));
}

#[test]
fn expired_token_is_rejected() {
    let t = token(
        json!({
            "sub": Uuid::new_v4().to_string(),
            "exp": now() - 3600,
            "aud": "authenticated"
        }),
        SECRET,
    );

    assert!(matches!(validate_token(&t, SECRET), Err(AuthError::TokenExpired)));
}

#[test]
fn wrong_secret_is_rejected() {
    let t = token(
        json!({
            "sub": Uuid::new_v4().to_string(),
            "exp": now() + 3600,
            "aud": "authenticated"
        }),
        "another-secret-another-secret-another-secret",
    );

    assert!(matches!(validate_token(&t, SECRET), Err(AuthError::Jwt(_))));
}

#[test]
fn anon_audience_is_rejected() {
    let t = token(
        json!({
            "sub": Uuid::new_v4().to_string(),
            "exp": now() + 3600,
            "aud": "anon"
        }),
        SECRET,
    );

    assert!(validate_token(&t, SECRET).is_err());
}

#[test]
fn non_uuid_subject_is_rejected() {
    let t = token(
        json!({ "sub": "service", "exp": now() + 3600, "aud": "authenticated" }),
        SECRET,
    );

    assert!(matches!(
        validate_token(&t, SECRET),
        Err(AuthError::InvalidToken(_))
    ));
}
