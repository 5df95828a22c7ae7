/// Screen dimensions and system bar insets, captured once per host.
///
/// Controllers receive this by value; nothing in the crate reads screen
/// state from anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenMetrics {
    pub width_px: i32,
    pub height_px: i32,
    pub status_bar_height_px: i32,
    pub soft_nav_bar_height_px: i32,
}

impl ScreenMetrics {
    pub const fn new(
        width_px: i32,
        height_px: i32,
        status_bar_height_px: i32,
        soft_nav_bar_height_px: i32,
    ) -> Self {
        Self {
            width_px: non_negative(width_px),
            height_px: non_negative(height_px),
            status_bar_height_px: non_negative(status_bar_height_px),
            soft_nav_bar_height_px: non_negative(soft_nav_bar_height_px),
        }
    }

    pub fn query(provider: &dyn ScreenMetricsProvider) -> Self {
        let metrics = provider.get();
        let metrics = Self::new(
            metrics.width_px,
            metrics.height_px,
            metrics.status_bar_height_px,
            metrics.soft_nav_bar_height_px,
        );
        tracing::debug!(?metrics, "screen metrics captured");
        metrics
    }

    pub const fn half_width(&self) -> i32 {
        self.width_px / 2
    }
}

pub trait ScreenMetricsProvider {
    fn get(&self) -> ScreenMetrics;
}

/// Provider returning a fixed value; used for headless hosts and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedScreenMetrics(pub ScreenMetrics);

impl ScreenMetricsProvider for FixedScreenMetrics {
    fn get(&self) -> ScreenMetrics {
        self.0
    }
}

const fn non_negative(value: i32) -> i32 {
    if value < 0 {
        0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_dimensions_are_clamped_to_zero() {
        let metrics = ScreenMetrics::new(-1, 2400, -60, 48);
        assert_eq!(metrics, ScreenMetrics::new(0, 2400, 0, 48));
    }

    #[test]
    fn query_reads_provider_once_and_normalizes() {
        let provider = FixedScreenMetrics(ScreenMetrics {
            width_px: 1080,
            height_px: 2400,
            status_bar_height_px: -5,
            soft_nav_bar_height_px: 48,
        });
        let metrics = ScreenMetrics::query(&provider);
        assert_eq!(metrics.width_px, 1080);
        assert_eq!(metrics.status_bar_height_px, 0);
        assert_eq!(metrics.half_width(), 540);
    }
}
