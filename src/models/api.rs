use serde::{ Serialize, Deserialize };

use super::compare::ComparisonResult;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub detail: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CompareResponse {
    pub result: String,
    pub results: ComparisonResult,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}
