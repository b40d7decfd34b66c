//! Gist API types, used to publish the SVG snapshot of a dry-run's output.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct CreateGistPayload {
    pub description: String,
    pub public: bool,
    pub files: HashMap<String, GistFileInput>,
}

#[derive(Debug, Serialize)]
pub struct GistFileInput {
    pub content: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Gist {
    pub id: String,
    pub html_url: String,
    pub files: HashMap<String, GistFile>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GistFile {
    pub filename: String,
    pub raw_url: String,
}
