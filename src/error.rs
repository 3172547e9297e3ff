use thiserror::Error;

/// 服务统一错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Establecimiento no válido.")]
    InvalidEstablishment { tag: String },

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("OCR failed: {message}")]
    Ocr { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// WebDriver 返回的协议错误 (`{"value": {"error", "message"}}`)
    #[error("WebDriver error ({error}): {message}")]
    WebDriver { error: String, message: String },

    #[error("Timed out after {timeout_ms} ms waiting for element {selector}")]
    ElementTimeout { selector: String, timeout_ms: u64 },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// WebDriver 的 "no such element" 错误，等待逻辑据此继续轮询
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, AppError::WebDriver { error, .. } if error == "no such element")
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_such_element_is_detected() {
        let err = AppError::WebDriver {
            error: "no such element".to_string(),
            message: "Unable to locate element".to_string(),
        };
        assert!(err.is_no_such_element());

        let err = AppError::WebDriver {
            error: "stale element reference".to_string(),
            message: "gone".to_string(),
        };
        assert!(!err.is_no_such_element());
    }

    #[test]
    fn invalid_establishment_message() {
        let err = AppError::InvalidEstablishment { tag: "/oxxo".to_string() };
        assert_eq!(err.to_string(), "Establecimiento no válido.");
    }
}
