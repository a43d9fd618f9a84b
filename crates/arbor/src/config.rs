//! Window configuration.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    event::Key,
    geom::Size,
};

/// Settings for a [`Window`](crate::window::Window). Every field has a
/// default, so a JSON document only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Initial width in pixels.
    pub width: f32,
    /// Initial height in pixels.
    pub height: f32,
    /// Layout passes per frame before giving up on convergence.
    pub max_layout_passes: usize,
    /// Pixels scrolled per wheel line.
    pub scroll_step: f32,
    /// Key that requests the window close.
    pub quit_key: Option<Key>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "arbor".into(),
            width: 800.0,
            height: 600.0,
            max_layout_passes: 8,
            scroll_step: 40.0,
            quit_key: Some(Key::Escape),
        }
    }
}

impl WindowConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_layout_passes == 0 {
            return Err(Error::Config("max_layout_passes must be at least 1".into()));
        }
        if !(self.scroll_step.is_finite() && self.scroll_step > 0.0) {
            return Err(Error::Config(format!(
                "scroll_step must be positive, got {}",
                self.scroll_step
            )));
        }
        Size::checked(self.width, self.height)?;
        Ok(())
    }

    /// Initial window size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the initial size.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the layout pass cap.
    pub fn max_layout_passes(mut self, passes: usize) -> Self {
        self.max_layout_passes = passes;
        self
    }

    /// Set the wheel scroll step.
    pub fn scroll_step(mut self, step: f32) -> Self {
        self.scroll_step = step;
        self
    }

    /// Set or clear the quit key.
    pub fn quit_key(mut self, key: Option<Key>) -> Self {
        self.quit_key = key;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() -> Result<()> {
        let c = WindowConfig::from_json(r#"{"title": "demo", "quit_key": {"char": "q"}}"#)?;
        assert_eq!(c.title, "demo");
        assert_eq!(c.quit_key, Some(Key::Char('q')));
        assert_eq!(c.max_layout_passes, WindowConfig::default().max_layout_passes);
        Ok(())
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            WindowConfig::from_json(r#"{"max_layout_passes": 0}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            WindowConfig::from_json(r#"{"scroll_step": -1.0}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            WindowConfig::from_json(r#"{"width": -5.0}"#),
            Err(Error::Geometry(_))
        ));
        assert!(matches!(
            WindowConfig::from_json("{not json"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn builders() {
        let c = WindowConfig::default()
            .title("x")
            .with_size(10.0, 20.0)
            .max_layout_passes(3)
            .scroll_step(12.0)
            .quit_key(None);
        assert_eq!(c.size(), Size::new(10.0, 20.0));
        assert_eq!(c.max_layout_passes, 3);
        assert_eq!(c.quit_key, None);
        assert!(c.validate().is_ok());
    }
}
