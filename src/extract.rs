//! 小票 OCR 文本的字段提取规则 (纯函数)

use crate::models::{BodegaAurreraFields, Establishment, ExtractionResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// Super Aki 小票上的 folio 标签，带空格的写法优先
const SUPER_AKI_LABELS: [&str; 2] = ["FOLIO FACTURACION:", "FOLIOFACTURACION:"];

// TR/TC 与数字之间允许任意非数字字符，C.P. 的点可省略
static TR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"TR\D*(\d+)").unwrap());
static TC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"TC\D*(\d+)").unwrap());
static CP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"C\.?P\.?\D*(\d+)").unwrap());

/// 按商户规则提取，未匹配返回 None
pub fn extract(establishment: Establishment, text: &str) -> Option<ExtractionResult> {
    match establishment {
        Establishment::SuperAki => super_aki_folio(text).map(ExtractionResult::Folio),
        Establishment::BodegaAurrera => {
            Some(ExtractionResult::BodegaAurrera(bodega_aurrera_fields(text)))
        }
    }
}

/// 取标签后的第一个空白分隔词，必须全为数字
pub fn super_aki_folio(text: &str) -> Option<u64> {
    let rest = SUPER_AKI_LABELS
        .iter()
        .find_map(|label| text.find(label).map(|idx| &text[idx + label.len()..]))?;

    let token = rest.split_whitespace().next()?;
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

pub fn bodega_aurrera_fields(text: &str) -> BodegaAurreraFields {
    BodegaAurreraFields {
        tr_number: first_number(&TR_RE, text),
        tc_number: first_number(&TC_RE, text),
        cp_number: first_number(&CP_RE, text),
        error: None,
    }
}

fn first_number(re: &Regex, text: &str) -> Option<u64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
