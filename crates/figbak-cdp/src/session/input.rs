//! Input (mouse and keyboard) operations for the CDP page session.

use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::error::CdpError;
use crate::protocol::{BoxModel, KeyEventType, MouseButton, MouseEventType};

use super::core::PageSession;

impl PageSession {
    /// Click the center of the first element matching `selector`.
    pub async fn click_selector(&self, selector: &str) -> Result<(), CdpError> {
        let node_id = self.wait_for_selector(selector, Duration::from_secs(30)).await?;

        let result = self
            .call("DOM.getBoxModel", Some(json!({"nodeId": node_id})))
            .await
            .map_err(|_| CdpError::ElementNotFound(format!("{} has no box model", selector)))?;
        let model: BoxModel = serde_json::from_value(result["model"].clone())?;
        let (x, y) = Self::quad_center(&model.content);

        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MousePressed,
                "x": x,
                "y": y,
                "button": MouseButton::Left,
                "clickCount": 1,
            })),
        )
        .await?;

        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MouseReleased,
                "x": x,
                "y": y,
                "button": MouseButton::Left,
                "clickCount": 1,
            })),
        )
        .await?;

        debug!("Clicked {} at ({}, {})", selector, x, y);
        Ok(())
    }

    /// Type text into the focused element, one keystroke per `delay`.
    pub async fn type_text(&self, text: &str, delay: Duration) -> Result<(), CdpError> {
        for ch in text.chars() {
            self.call("Input.insertText", Some(json!({"text": ch.to_string()})))
                .await?;
            tokio::time::sleep(delay).await;
        }
        debug!("Typed {} characters", text.chars().count());
        Ok(())
    }

    /// Press and release a key.
    pub async fn press_key(&self, key: &str) -> Result<(), CdpError> {
        self.dispatch_key(KeyEventType::KeyDown, key, 0).await?;
        self.dispatch_key(KeyEventType::KeyUp, key, 0).await
    }

    /// Press `key` while holding `modifier` (e.g. "Control" + "p").
    pub async fn key_chord(&self, modifier: &str, key: &str) -> Result<(), CdpError> {
        let flags = Self::modifier_flags(&[modifier]);

        self.dispatch_key(KeyEventType::RawKeyDown, modifier, flags).await?;
        self.dispatch_key(KeyEventType::KeyDown, key, flags).await?;
        self.dispatch_key(KeyEventType::KeyUp, key, flags).await?;
        self.dispatch_key(KeyEventType::KeyUp, modifier, 0).await?;

        Ok(())
    }

    async fn dispatch_key(
        &self,
        kind: KeyEventType,
        key: &str,
        modifiers: i32,
    ) -> Result<(), CdpError> {
        let mut params = json!({
            "type": kind,
            "key": key,
            "modifiers": modifiers,
        });

        if let Some((code, vk)) = Self::key_location(key) {
            params["code"] = json!(code);
            params["windowsVirtualKeyCode"] = json!(vk);
            params["nativeVirtualKeyCode"] = json!(vk);
        }
        // Enter must carry its text for the page to see a real keypress.
        if key == "Enter" && matches!(kind, KeyEventType::KeyDown) {
            params["text"] = json!("\r");
        }

        self.call("Input.dispatchKeyEvent", Some(params)).await?;
        Ok(())
    }

    /// DOM `code` value and virtual key code for the keys the bot presses.
    pub(crate) fn key_location(key: &str) -> Option<(String, i32)> {
        match key {
            "Enter" => Some(("Enter".to_string(), 13)),
            "Escape" => Some(("Escape".to_string(), 27)),
            "Shift" => Some(("ShiftLeft".to_string(), 16)),
            "Control" => Some(("ControlLeft".to_string(), 17)),
            "Alt" => Some(("AltLeft".to_string(), 18)),
            "Meta" => Some(("MetaLeft".to_string(), 91)),
            _ => {
                let mut chars = key.chars();
                let c = chars.next()?;
                if chars.next().is_some() || !c.is_ascii_alphabetic() {
                    return None;
                }
                let upper = c.to_ascii_uppercase();
                Some((format!("Key{}", upper), upper as i32))
            }
        }
    }

    /// CDP modifier bitmask from modifier names.
    pub(crate) fn modifier_flags(modifiers: &[&str]) -> i32 {
        let mut flags = 0;
        for m in modifiers {
            match m.to_lowercase().as_str() {
                "alt" => flags |= 1,
                "control" | "ctrl" => flags |= 2,
                "meta" | "command" | "cmd" => flags |= 4,
                "shift" => flags |= 8,
                _ => {}
            }
        }
        flags
    }

    /// Center of an 8-number CDP quad.
    pub(crate) fn quad_center(quad: &[f64]) -> (f64, f64) {
        let x = (quad[0] + quad[2] + quad[4] + quad[6]) / 4.0;
        let y = (quad[1] + quad[3] + quad[5] + quad[7]) / 4.0;
        (x, y)
    }
}
