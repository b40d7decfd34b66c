//! Loads the GitHub App credentials pointed to by `SHERIFF_GITHUB_APP_CREDS`,
//! a JSON file of the form `{"app_id": <u64>, "private_key": "<pem>"}`.

use serde::Deserialize;

use crate::Error;

#[derive(Deserialize)]
struct Creds {
    app_id: u64,
    private_key: String,
}

pub fn load() -> Result<(u64, String), Error> {
    let path = std::env::var("SHERIFF_GITHUB_APP_CREDS")
        .map_err(|_| Error::MissingEnvVar("SHERIFF_GITHUB_APP_CREDS".to_string()))?;
    let raw = std::fs::read_to_string(&path).map_err(|e| Error::CredentialsUnreadable(path.clone(), e.to_string()))?;
    let creds: Creds = serde_json::from_str(&raw).map_err(|e| Error::CredentialsUnreadable(path.clone(), e.to_string()))?;
    Ok((creds.app_id, creds.private_key))
}
