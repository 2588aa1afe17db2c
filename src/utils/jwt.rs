use crate::errors::Result;
use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation, decode};

/// Claims of the login token issued by the municipal sign-in service.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub groups: Vec<String>,
    pub exp: usize,
}

#[cfg(test)]
pub fn encode_jwt(claim: &Claims, secret: &str) -> Result<String> {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let token = encode(
        &Header::new(Algorithm::HS256),
        claim,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

pub fn decode_jwt(token: &str, secret: &str, leeway_secs: u64) -> Result<TokenData<Claims>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = leeway_secs;
    validation.validate_aud = false;

    let token = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;

    Ok(token)
}
