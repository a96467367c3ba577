use rollbook::config::jwt::JwtConfig;
use rollbook::utils::jwt::{create_access_token, verify_token};

fn test_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_token_round_trip() {
    let config = test_config();
    let token = create_access_token(42, "alice", &config).unwrap();
    let claims = verify_token(&token, &config).unwrap();

    assert_eq!(claims.sub, "42");
    assert_eq!(claims.username, "alice");
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_tampered_token_rejected() {
    let config = test_config();
    let token = create_access_token(42, "alice", &config).unwrap();

    let mut tampered = token.clone();
    tampered.pop();
    tampered.push('x');
    assert!(verify_token(&tampered, &config).is_err());
}

#[test]
fn test_wrong_secret_rejected() {
    let config = test_config();
    let token = create_access_token(42, "alice", &config).unwrap();

    let other = JwtConfig {
        secret: "another-secret".to_string(),
        access_token_expiry: 3600,
    };
    assert!(verify_token(&token, &other).is_err());
}

#[test]
fn test_garbage_token_rejected() {
    assert!(verify_token("not-a-jwt", &test_config()).is_err());
}
