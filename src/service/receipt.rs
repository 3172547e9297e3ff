use crate::error::Result;
use crate::extract;
use crate::models::{Establishment, ExtractionResult};
use crate::ocr::OcrEngine;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;

/// 小票识别服务: base64 图片 -> OCR 文本 -> 商户规则提取
pub struct ReceiptService {
    ocr: Arc<dyn OcrEngine>,
}

impl ReceiptService {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }

    /// 商户标签先校验，不支持的商户不会触发 OCR
    pub async fn obtain_folio(
        &self,
        establishment_tag: &str,
        base64_image: &str,
    ) -> Result<Option<ExtractionResult>> {
        let establishment: Establishment = establishment_tag.parse()?;

        let image = decode_base64_image(base64_image)?;
        tracing::info!("Receipt for {}: {} bytes decoded", establishment, image.len());

        let text = self.ocr.recognize(&image).await?;
        let result = extract::extract(establishment, &text);

        match &result {
            Some(found) => tracing::info!("Receipt for {}: extracted {:?}", establishment, found),
            None => tracing::warn!("Receipt for {}: no folio found in OCR text", establishment),
        }
        Ok(result)
    }
}

/// 解码 base64，允许带 `data:image/...;base64,` 前缀和换行
pub fn decode_base64_image(input: &str) -> Result<Vec<u8>> {
    let payload = match input.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => input,
    };
    let cleaned: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(cleaned)?)
}
