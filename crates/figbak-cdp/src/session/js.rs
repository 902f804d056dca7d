//! JavaScript execution for the CDP page session.

use serde_json::{Value, json};

use crate::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Evaluate a JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["text"].as_str().unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }

    /// The `class` attribute of the first element matching `selector`,
    /// `None` when no such element exists.
    pub async fn element_class(&self, selector: &str) -> Result<Option<String>, CdpError> {
        let quoted = serde_json::to_string(selector)?;
        let expression = format!(
            "(() => {{ const el = document.querySelector({}); return el ? el.className : null; }})()",
            quoted
        );
        let value = self.evaluate(&expression).await?;
        Ok(value.as_str().map(|s| s.to_string()))
    }
}
