use serde::{Deserialize, Serialize};

/// Create input. `image` is the stored path handed back by the upload layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaceInput {
    pub title: String,
    pub description: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub image: String,
}

/// Update input; only title and description are mutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePlaceInput {
    pub title: String,
    pub description: String,
}
