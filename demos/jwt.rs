// Signs a session token with the RFC 7515 test key and verifies it with the
// key in both of its public forms.
//
// RUST_LOG=debug cargo run --example jwt

use rsa_jwt::{decode, sign, verify, Header, KeyMaterial, SignOptions};

fn main() {
    env_logger::init();

    let private_jwk = include_str!("../tests/rsa2048-rfc7515.json");
    let key: rsa_jwt::JWK = serde_json::from_str(private_jwk).unwrap();
    let public_jwk = KeyMaterial::from(key.to_public());
    let public_pem = KeyMaterial::pem(include_str!("../tests/rsa2048-rfc7515-pk.pem"));

    let claims = serde_json::json!({
        "iss": "https://clerk.inspired.puma-74.lcl.dev",
        "sub": "user_2GIpXOEpVyJw51rkZn9Kmnc6Sxr",
        "sid": "sess_2GbDB4enNdCa5vS1zpC3Xzg9tK9"
    });
    let serde_json::Value::Object(claims) = claims else {
        unreachable!()
    };

    let options = SignOptions::new("RS256").with_header(Header::default().with_key_id("rfc7515"));
    let token = sign(&claims, &KeyMaterial::from(key), &options).unwrap();
    println!("{token}");

    let jwt = decode(&token).unwrap();
    for public_key in [&public_jwk, &public_pem] {
        if !verify(&jwt, public_key).unwrap() {
            panic!("verify failed with {:?}", public_key);
        }
    }
    let stdout_writer = std::io::BufWriter::new(std::io::stdout());
    serde_json::to_writer_pretty(stdout_writer, jwt.payload()).unwrap();
}
