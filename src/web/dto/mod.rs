//! Response shapes. Every body carries `success`; failures are shaped by
//! `crate::web::error::ErrorResponse`.

pub mod mentorship;
pub mod modules;
pub mod stats;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok<S: Into<String>>(message: S) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
