use serde::{Deserialize, Serialize};

/// 请求体: /api/facturar_super-aki (字段名沿用前端约定)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceRequest {
    /// RFC (税号)
    #[serde(rename = "RFC_Field", default)]
    pub rfc: String,
    #[serde(rename = "folioField", default)]
    pub folio: String,
    /// 发票用途代码 (uso CFDI)
    #[serde(rename = "uso_CFID", default)]
    pub uso_cfdi: String,
    /// 税务制度代码
    #[serde(rename = "opcion_regimen_elegida", default)]
    pub regimen_fiscal: String,
}

/// 响应体: /api/facturar_super-aki
#[derive(Debug, Serialize, Deserialize)]
pub struct InvoiceResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_factura: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl InvoiceResponse {
    pub fn generated(pdf_url: String) -> Self {
        Self { success: true, pdf_factura: Some(pdf_url), message: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, pdf_factura: None, message: Some(message.into()) }
    }
}
