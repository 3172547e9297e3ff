use crate::config::{SuperAkiConfig, WebDriverConfig};
use crate::error::{AppError, Result};
use crate::models::InvoiceRequest;
use crate::webdriver::{Locator, Session, Wait, WebDriverClient};
use std::time::Duration;
use tokio::sync::Semaphore;

// Super Aki 开票页面 (ASP.NET WebForms) 的元素 id
const RFC_INPUT: &str = "MainContent_txtRFC";
const FOLIO_RADIO: &str = "MainContent_rbFolio";
const FOLIO_INPUT: &str = "MainContent_txtFolioFacturacion";
const NEXT_BUTTON: &str = "MainContent_btnSiguienteFolio";
const CFDI_SELECT: &str = "MainContent_cboCFDI";
const REGIMEN_SELECT: &str = "MainContent_cboRegimenFiscal";
const INVOICE_BUTTON: &str = "MainContent_btnFacturar";
const PDF_LINK: &str = "MainContent_aPDF";

/// Super Aki 自动开票
///
/// 每次调用独占一个浏览器会话，结束时无论成功失败都会关闭；
/// 并发会话数由信号量限制。
pub struct SuperAkiInvoicer {
    client: WebDriverClient,
    chrome_args: Vec<String>,
    form_url: String,
    wait: Wait,
    sessions: Semaphore,
}

impl SuperAkiInvoicer {
    pub fn new(webdriver: &WebDriverConfig, super_aki: &SuperAkiConfig) -> Self {
        Self {
            client: WebDriverClient::new(&webdriver.url),
            chrome_args: webdriver.chrome_args.clone(),
            form_url: super_aki.form_url.clone(),
            wait: Wait::new(
                Duration::from_millis(webdriver.wait_timeout_ms),
                Duration::from_millis(webdriver.poll_interval_ms),
            ),
            sessions: Semaphore::new(webdriver.max_sessions.max(1)),
        }
    }

    /// 填写并提交开票表单，返回 PDF 链接
    pub async fn generate_invoice(&self, req: &InvoiceRequest) -> Result<String> {
        let _permit = self.sessions.acquire().await.map_err(|e| AppError::WebDriver {
            error: "session not created".to_string(),
            message: e.to_string(),
        })?;

        let session = self.client.new_session(&self.chrome_args).await?;
        let session_id = session.id().to_string();
        let outcome = self.fill_form(&session, req).await;

        if let Err(e) = session.quit().await {
            tracing::warn!("Failed to close WebDriver session {}: {}", session_id, e);
        }

        match &outcome {
            Ok(url) => tracing::info!("Invoice generated for folio {}: {}", req.folio, url),
            Err(e) => tracing::error!("Invoice generation for folio {} failed: {}", req.folio, e),
        }
        outcome
    }

    async fn fill_form(&self, session: &Session, req: &InvoiceRequest) -> Result<String> {
        session.goto(&self.form_url).await?;

        let rfc = self.wait.until_present(session, &Locator::id(RFC_INPUT)).await?;
        session.send_keys(&rfc, &req.rfc).await?;

        let by_folio = self.wait.until_clickable(session, &Locator::id(FOLIO_RADIO)).await?;
        session.click(&by_folio).await?;

        let folio = self.wait.until_present(session, &Locator::id(FOLIO_INPUT)).await?;
        session.send_keys(&folio, &req.folio).await?;

        let next = self.wait.until_clickable(session, &Locator::id(NEXT_BUTTON)).await?;
        session.click(&next).await?;

        let cfdi = self.wait.until_present(session, &Locator::id(CFDI_SELECT)).await?;
        session.select_by_value(&cfdi, &req.uso_cfdi).await?;

        let regimen = self.wait.until_present(session, &Locator::id(REGIMEN_SELECT)).await?;
        session.select_by_value(&regimen, &req.regimen_fiscal).await?;

        let submit = self.wait.until_clickable(session, &Locator::id(INVOICE_BUTTON)).await?;
        session.click(&submit).await?;

        let link = self.wait.until_present(session, &Locator::id(PDF_LINK)).await?;
        // property 返回解析后的绝对地址，取不到时退回原始属性
        let href = match session.property(&link, "href").await? {
            Some(href) => Some(href),
            None => session.attribute(&link, "href").await?,
        };

        href.ok_or_else(|| AppError::WebDriver {
            error: "no such attribute".to_string(),
            message: format!("element {} has no href", PDF_LINK),
        })
    }
}
