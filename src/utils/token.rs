use hmac::{Hmac, Mac};
use rand::{Rng, distr::Alphanumeric};
use sha2::Sha256;

use crate::{
    consts::auth_const::SESSION_TOKEN_LEN,
    errors::{Error, Result},
};

pub fn generate_session_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect::<String>()
}

/// Store key for a session token; the raw token only lives in the cookie.
pub fn session_key(secret: &str, token: &str) -> Result<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::Config(format!("session secret: {e}")))?;
    mac.update(token.as_bytes());

    Ok(format!("{:x}", mac.finalize().into_bytes()))
}
