use super::locator::{xpath_literal, Locator};
use crate::error::{AppError, Result};
use reqwest::{Client, Method};
use serde_json::{json, Value};

/// W3C 规定的元素引用键
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// WebDriver 服务端连接 (无状态，可廉价克隆)
#[derive(Clone)]
pub struct WebDriverClient {
    http: Client,
    base_url: String,
}

impl WebDriverClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 创建一个新的 Chrome 会话
    pub async fn new_session(&self, chrome_args: &[String]) -> Result<Session> {
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": chrome_args }
                }
            }
        });

        let value = self.send(Method::POST, "/session", Some(capabilities)).await?;
        let id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::WebDriver {
                error: "session not created".to_string(),
                message: format!("missing sessionId in response: {}", value),
            })?
            .to_string();

        tracing::info!("WebDriver session {} created", id);
        Ok(Session { client: self.clone(), id, closed: false })
    }

    /// 发送命令并取出响应中的 `value`
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);
        let value = payload.get("value").cloned().unwrap_or(Value::Null);

        if !status.is_success() {
            let error = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} {} returned {}", method, path, status));
            return Err(AppError::WebDriver { error, message });
        }

        Ok(value)
    }
}

/// 页面元素引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: String,
}

impl Element {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(|id| Element { id: id.to_string() })
            .ok_or_else(|| AppError::WebDriver {
                error: "invalid element reference".to_string(),
                message: format!("unexpected element payload: {}", value),
            })
    }
}

/// 一个浏览器会话
///
/// 正常结束时调用 [`Session::quit`]；未关闭就被 drop (例如调用方的 future
/// 被取消) 时，在后台任务里删除会话。
pub struct Session {
    client: WebDriverClient,
    id: String,
    closed: bool,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    async fn cmd(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let path = format!("/session/{}{}", self.id, path);
        self.client.send(method, &path, body).await
    }

    async fn element_cmd(
        &self,
        method: Method,
        element: &Element,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value> {
        self.cmd(method, &format!("/element/{}{}", element.id, path), body).await
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        self.cmd(Method::POST, "/url", Some(json!({ "url": url }))).await?;
        Ok(())
    }

    pub async fn find(&self, locator: &Locator) -> Result<Element> {
        let body = json!({ "using": locator.strategy(), "value": locator.value() });
        let value = self.cmd(Method::POST, "/element", Some(body)).await?;
        Element::from_value(&value)
    }

    /// 在父元素内部查找
    pub async fn find_from(&self, parent: &Element, locator: &Locator) -> Result<Element> {
        let body = json!({ "using": locator.strategy(), "value": locator.value() });
        let value = self.element_cmd(Method::POST, parent, "/element", Some(body)).await?;
        Element::from_value(&value)
    }

    pub async fn click(&self, element: &Element) -> Result<()> {
        self.element_cmd(Method::POST, element, "/click", Some(json!({}))).await?;
        Ok(())
    }

    pub async fn send_keys(&self, element: &Element, text: &str) -> Result<()> {
        let chars: Vec<String> = text.chars().map(String::from).collect();
        let body = json!({ "text": text, "value": chars });
        self.element_cmd(Method::POST, element, "/value", Some(body)).await?;
        Ok(())
    }

    pub async fn is_displayed(&self, element: &Element) -> Result<bool> {
        let value = self.element_cmd(Method::GET, element, "/displayed", None).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    pub async fn is_enabled(&self, element: &Element) -> Result<bool> {
        let value = self.element_cmd(Method::GET, element, "/enabled", None).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    pub async fn property(&self, element: &Element, name: &str) -> Result<Option<String>> {
        let value = self
            .element_cmd(Method::GET, element, &format!("/property/{}", name), None)
            .await?;
        Ok(value.as_str().map(str::to_string))
    }

    pub async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>> {
        let value = self
            .element_cmd(Method::GET, element, &format!("/attribute/{}", name), None)
            .await?;
        Ok(value.as_str().map(str::to_string))
    }

    /// 下拉框按 option 的 value 选择
    pub async fn select_by_value(&self, select: &Element, value: &str) -> Result<()> {
        let option = Locator::XPath(format!(".//option[@value = {}]", xpath_literal(value)));
        let element = self.find_from(select, &option).await.map_err(|e| {
            if e.is_no_such_element() {
                AppError::WebDriver {
                    error: "no such element".to_string(),
                    message: format!("Cannot locate option with value: {}", value),
                }
            } else {
                e
            }
        })?;
        self.click(&element).await
    }

    /// 关闭会话 (释放浏览器)
    pub async fn quit(mut self) -> Result<()> {
        let result = self.cmd(Method::DELETE, "", None).await;
        // DELETE 已发出 (无论成败)，drop 时不再重复关闭
        self.closed = true;
        result?;
        tracing::info!("WebDriver session {} closed", self.id);
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("WebDriver session {} dropped outside a runtime, not closed", self.id);
            return;
        };

        let client = self.client.clone();
        let id = std::mem::take(&mut self.id);
        tracing::warn!("WebDriver session {} dropped before quit, closing in background", id);
        runtime.spawn(async move {
            let path = format!("/session/{}", id);
            if let Err(e) = client.send(Method::DELETE, &path, None).await {
                tracing::warn!("Failed to close abandoned WebDriver session {}: {}", id, e);
            }
        });
    }
}
