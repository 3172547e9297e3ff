//! OCR 引擎封装
//!
//! 通过 `tesseract` 命令行识别图片：图片先用 `image` 解码并统一转成 PNG，
//! 再经 stdin 传给子进程，从 stdout 读取识别文本。

use crate::config::OcrConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use image::ImageFormat;
use std::io::Cursor;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// 图片 -> 文本
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<String>;
}

pub struct TesseractEngine {
    config: OcrConfig,
}

impl TesseractEngine {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// tesseract 命令行参数 (输入输出走 stdin/stdout)
    pub fn args(&self) -> Vec<String> {
        vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.config.language.clone(),
            "--psm".to_string(),
            self.config.page_seg_mode.to_string(),
            "-c".to_string(),
            format!("tessedit_char_whitelist={}", self.config.char_whitelist),
        ]
    }
}

/// 解码任意支持格式的图片并重新编码为 PNG
pub fn normalize_to_png(bytes: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(&self, image: &[u8]) -> Result<String> {
        let owned = image.to_vec();
        let png = tokio::task::spawn_blocking(move || normalize_to_png(&owned))
            .await
            .map_err(|e| AppError::Ocr { message: format!("image task failed: {}", e) })??;

        tracing::debug!("Running {} on {} bytes of PNG", self.config.tesseract_path, png.len());

        let mut child = Command::new(&self.config.tesseract_path)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::Ocr {
                message: format!(
                    "failed to start tesseract (path='{}'): {}",
                    self.config.tesseract_path, e
                ),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&png).await?;
            // 关闭 stdin，tesseract 才会开始识别
            drop(stdin);
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(AppError::Ocr {
                message: format!(
                    "tesseract exited with code {}: {}",
                    output.status.code().unwrap_or(-1),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!("OCR result: {:?}", text);
        Ok(text)
    }
}
