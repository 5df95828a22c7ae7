use std::rc::Rc;

use super::{BubbleSettings, ConfigError};
use crate::animation::EdgeSnapTiming;
use crate::close_zone::CloseZoneTuning;
use crate::geometry::{Point, Size};
use crate::icon::{default_close_icon, Icon, IconResolver, IconSource};
use crate::listener::{BubbleListener, ListenerChain};
use crate::overlay::StyleToken;

pub const DEFAULT_BUBBLE_SIZE_PX: i32 = 160;

#[derive(Debug, Clone)]
pub struct BubbleSpec {
    pub size: Size,
    pub icon: Icon,
    pub opacity: f32,
    pub style: Option<StyleToken>,
}

#[derive(Debug, Clone)]
pub struct CloseZoneSpec {
    pub size: Size,
    pub icon: Icon,
    pub style: Option<StyleToken>,
    pub opacity: f32,
}

/// Validated, immutable configuration produced by [`BubbleBuilder::build`].
#[derive(Debug, Clone)]
pub struct BubbleConfig {
    pub bubble: BubbleSpec,
    pub close_zone: CloseZoneSpec,
    pub start_position: Point,
    pub close_zone_enabled: bool,
    pub edge_snap_enabled: bool,
    pub bottom_background_enabled: bool,
    pub tuning: CloseZoneTuning,
    pub edge_snap_timing: EdgeSnapTiming,
    pub listeners: ListenerChain,
}

#[derive(Debug, Clone)]
pub struct BubbleBuilder {
    bubble_image: Option<IconSource>,
    bubble_size: Size,
    bubble_style: Option<StyleToken>,
    close_bubble_image: Option<IconSource>,
    close_bubble_size: Size,
    close_bubble_style: Option<StyleToken>,
    start_position: Point,
    opacity: f32,
    close_zone_enabled: bool,
    edge_snap_enabled: bool,
    bottom_background_enabled: bool,
    tuning: CloseZoneTuning,
    edge_snap_timing: EdgeSnapTiming,
    listeners: ListenerChain,
}

impl Default for BubbleBuilder {
    fn default() -> Self {
        let default_size = Size::new(DEFAULT_BUBBLE_SIZE_PX, DEFAULT_BUBBLE_SIZE_PX);
        Self {
            bubble_image: None,
            bubble_size: default_size,
            bubble_style: None,
            close_bubble_image: None,
            close_bubble_size: default_size,
            close_bubble_style: None,
            start_position: Point::default(),
            opacity: 1.0,
            close_zone_enabled: true,
            edge_snap_enabled: true,
            bottom_background_enabled: false,
            tuning: CloseZoneTuning::default(),
            edge_snap_timing: EdgeSnapTiming::default(),
            listeners: ListenerChain::new(),
        }
    }
}

impl BubbleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bubble_image(mut self, source: IconSource) -> Self {
        self.bubble_image = Some(source);
        self
    }

    pub fn bubble_size(mut self, width: i32, height: i32) -> Self {
        self.bubble_size = Size::new(width, height);
        self
    }

    pub fn bubble_style(mut self, style: Option<StyleToken>) -> Self {
        self.bubble_style = style;
        self
    }

    pub fn close_bubble_image(mut self, source: IconSource) -> Self {
        self.close_bubble_image = Some(source);
        self
    }

    /// A zero size makes the close bubble match the bubble.
    pub fn close_bubble_size(mut self, width: i32, height: i32) -> Self {
        self.close_bubble_size = Size::new(width, height);
        self
    }

    pub fn close_bubble_style(mut self, style: Option<StyleToken>) -> Self {
        self.close_bubble_style = style;
        self
    }

    /// Top-left of the bubble on first show. Negative or out-of-screen
    /// values are allowed and leave the bubble partly off screen.
    pub fn start_position(mut self, x: i32, y: i32) -> Self {
        self.start_position = Point::new(x, y);
        self
    }

    /// 0.0 is invisible, 1.0 fully opaque; values outside are clamped and
    /// NaN or infinite values fall back to fully opaque.
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn close_zone(mut self, enabled: bool) -> Self {
        self.close_zone_enabled = enabled;
        self
    }

    pub fn edge_snap(mut self, enabled: bool) -> Self {
        self.edge_snap_enabled = enabled;
        self
    }

    pub fn bottom_background(mut self, enabled: bool) -> Self {
        self.bottom_background_enabled = enabled;
        self
    }

    pub fn tuning(mut self, tuning: CloseZoneTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn edge_snap_timing(mut self, timing: EdgeSnapTiming) -> Self {
        self.edge_snap_timing = timing;
        self
    }

    /// Registers a listener after every listener added so far.
    pub fn add_listener(mut self, listener: Rc<dyn BubbleListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn with_settings(mut self, settings: &BubbleSettings) -> Self {
        if let Some(path) = &settings.bubble_image {
            self.bubble_image = Some(IconSource::path(path));
        }
        if let Some(size) = settings.bubble_size {
            self.bubble_size = size;
        }
        if let Some(path) = &settings.close_bubble_image {
            self.close_bubble_image = Some(IconSource::path(path));
        }
        if let Some(size) = settings.close_bubble_size {
            self.close_bubble_size = size;
        }
        if let Some(position) = settings.start_position {
            self.start_position = position;
        }
        if let Some(opacity) = settings.opacity {
            self.opacity = opacity;
        }
        if let Some(enabled) = settings.close_zone_enabled {
            self.close_zone_enabled = enabled;
        }
        if let Some(enabled) = settings.edge_snap_enabled {
            self.edge_snap_enabled = enabled;
        }
        if let Some(enabled) = settings.bottom_background_enabled {
            self.bottom_background_enabled = enabled;
        }
        if let Some(tuning) = settings.close_zone {
            self.tuning = tuning;
        }
        if let Some(edge_snap) = settings.edge_snap {
            self.edge_snap_timing = edge_snap.timing();
        }
        self
    }

    /// Validates and resolves icons. Fails before any overlay exists.
    pub fn build(self, resolver: &dyn IconResolver) -> Result<BubbleConfig, ConfigError> {
        let bubble_source = self
            .bubble_image
            .as_ref()
            .ok_or(ConfigError::MissingBubbleImage)?;
        let bubble_icon = resolver.resolve(bubble_source)?;

        let close_size = if self.close_bubble_size.is_empty() {
            self.bubble_size
        } else {
            self.close_bubble_size
        };
        let close_icon = match &self.close_bubble_image {
            Some(source) => resolver.resolve(source)?,
            None => default_close_icon(close_size.width.max(close_size.height).max(1) as u32),
        };

        let opacity = if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        if opacity != self.opacity {
            tracing::warn!(requested = self.opacity, opacity, "opacity clamped to [0, 1]");
        }

        Ok(BubbleConfig {
            bubble: BubbleSpec {
                size: self.bubble_size,
                icon: bubble_icon,
                opacity,
                style: self.bubble_style,
            },
            close_zone: CloseZoneSpec {
                size: close_size,
                icon: close_icon,
                style: self.close_bubble_style,
                opacity,
            },
            start_position: self.start_position,
            close_zone_enabled: self.close_zone_enabled,
            edge_snap_enabled: self.edge_snap_enabled,
            bottom_background_enabled: self.bottom_background_enabled,
            tuning: self.tuning,
            edge_snap_timing: self.edge_snap_timing,
            listeners: self.listeners,
        })
    }
}
