use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 支持的商户 (请求中以路径形式的标签表示)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Establishment {
    SuperAki,
    BodegaAurrera,
}

impl Establishment {
    pub fn tag(&self) -> &'static str {
        match self {
            Establishment::SuperAki => "/super-aki",
            Establishment::BodegaAurrera => "/bodega-aurrera",
        }
    }
}

impl FromStr for Establishment {
    type Err = AppError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "/super-aki" => Ok(Establishment::SuperAki),
            "/bodega-aurrera" => Ok(Establishment::BodegaAurrera),
            other => Err(AppError::InvalidEstablishment { tag: other.to_string() }),
        }
    }
}

impl fmt::Display for Establishment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Bodega Aurrera 小票字段，各字段可独立缺失
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodegaAurreraFields {
    #[serde(rename = "TR_number")]
    pub tr_number: Option<u64>,
    #[serde(rename = "TC_number")]
    pub tc_number: Option<u64>,
    #[serde(rename = "CP_number")]
    pub cp_number: Option<u64>,
    pub error: Option<String>,
}

/// 提取结果: 纯数字 folio 或 Bodega Aurrera 字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionResult {
    Folio(u64),
    BodegaAurrera(BodegaAurreraFields),
}

/// 请求体: /api/obtener_folio
#[derive(Debug, Default, Deserialize)]
pub struct FolioRequest {
    #[serde(default)]
    pub establecimiento: String,
    #[serde(default)]
    pub base64_image: String,
}

/// 响应体: /api/obtener_folio
#[derive(Debug, Serialize, Deserialize)]
pub struct FolioResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folio_number: Option<ExtractionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FolioResponse {
    pub fn found(result: ExtractionResult) -> Self {
        Self { success: true, folio_number: Some(result), message: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, folio_number: None, message: Some(message.into()) }
    }
}
