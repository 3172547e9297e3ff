/// 元素定位方式 (页面元素统一按 XPath 查找)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    XPath(String),
}

impl Locator {
    /// 按 id 定位，生成 `//*[@id="..."]`
    pub fn id(id: &str) -> Self {
        Locator::XPath(format!("//*[@id={}]", xpath_literal(id)))
    }

    /// W3C `using` 字段
    pub fn strategy(&self) -> &'static str {
        match self {
            Locator::XPath(_) => "xpath",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Locator::XPath(v) => v,
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

/// 将任意字符串转成 XPath 字符串字面量，同时含两种引号时用 concat()
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    if !value.contains('\'') {
        return format!("'{}'", value);
    }

    let parts: Vec<String> = value.split('"').map(|p| format!("\"{}\"", p)).collect();
    format!("concat({})", parts.join(", '\"', "))
}
