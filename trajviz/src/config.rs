use std::time::Duration;

use crate::error::{Error, Result};
use crate::scene::AxisMode;

pub const DEFAULT_FRAME_RATE: f64 = 30.0;
pub const DEFAULT_ROBOT_RADIUS: f64 = 0.09;
pub const DEFAULT_LINE_ALPHA: f64 = 0.3;
pub const DEFAULT_PICK_RADIUS: f64 = 5.0;

/// Everything that shapes how a trajectory table is played back and drawn.
#[derive(Clone, Debug)]
pub struct AnimationConfig {
    pub frame_rate: f64,
    /// Playback speed multiplier; 0.25 plays at a quarter of real time.
    pub speed: f64,
    /// Encoding rate of exported gifs, independent of `speed`.
    pub gif_frame_rate: f64,
    /// Robot radius in data units.
    pub robot_radius: f64,
    pub size: (u32, u32),
    pub title: Option<String>,
    pub axis: AxisMode,
    pub line_alpha: f64,
    /// Pointer distance in pixels within which a trail counts as hovered.
    pub pick_radius: f64,
    /// Draw caption, mesh and axis labels. Turning this off removes every text element.
    pub labels: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            frame_rate: DEFAULT_FRAME_RATE,
            speed: 1.0,
            gif_frame_rate: DEFAULT_FRAME_RATE,
            robot_radius: DEFAULT_ROBOT_RADIUS,
            size: (640, 480),
            title: None,
            axis: AxisMode::Fit,
            line_alpha: DEFAULT_LINE_ALPHA,
            pick_radius: DEFAULT_PICK_RADIUS,
            labels: true,
        }
    }
}

impl AnimationConfig {
    pub fn set_frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn set_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn set_gif_frame_rate(mut self, gif_frame_rate: f64) -> Self {
        self.gif_frame_rate = gif_frame_rate;
        self
    }

    pub fn set_robot_radius(mut self, robot_radius: f64) -> Self {
        self.robot_radius = robot_radius;
        self
    }

    pub fn set_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn set_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn set_axis(mut self, axis: AxisMode) -> Self {
        self.axis = axis;
        self
    }

    pub fn set_line_alpha(mut self, line_alpha: f64) -> Self {
        self.line_alpha = line_alpha;
        self
    }

    pub fn set_pick_radius(mut self, pick_radius: f64) -> Self {
        self.pick_radius = pick_radius;
        self
    }

    pub fn set_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    /// Wall-clock time between two presented frames. Rates must be positive and finite.
    pub fn frame_interval(&self) -> Result<Duration> {
        let invalid = || Error::InvalidRate {
            frame_rate: self.frame_rate,
            speed: self.speed,
        };
        if !is_positive(self.frame_rate) || !is_positive(self.speed) {
            return Err(invalid());
        }
        Duration::try_from_secs_f64(1.0 / self.frame_rate / self.speed).map_err(|_| invalid())
    }

    pub fn gif_frame_delay_ms(&self) -> Result<u32> {
        if !is_positive(self.gif_frame_rate) {
            return Err(Error::InvalidGifRate(self.gif_frame_rate));
        }
        Ok((1000.0 / self.gif_frame_rate).round().min(u32::MAX as f64) as u32)
    }
}

fn is_positive(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_interval() {
        let config = AnimationConfig::default();
        assert_eq!(config.frame_interval().unwrap().as_micros(), 33_333);
        assert_eq!(config.gif_frame_delay_ms().unwrap(), 33);
    }

    #[test]
    fn test_speed_scales_playback_only() {
        let config = AnimationConfig::default().set_speed(0.25);
        assert_eq!(config.frame_interval().unwrap().as_micros(), 133_333);
        assert_eq!(config.gif_frame_delay_ms().unwrap(), 33);
    }

    #[test]
    fn test_rejects_non_positive_rates() {
        for speed in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = AnimationConfig::default().set_speed(speed);
            assert!(matches!(
                config.frame_interval(),
                Err(Error::InvalidRate { .. })
            ));
        }

        let config = AnimationConfig::default().set_frame_rate(0.0);
        assert!(matches!(
            config.frame_interval(),
            Err(Error::InvalidRate { .. })
        ));

        let config = AnimationConfig::default().set_gif_frame_rate(-30.0);
        assert!(matches!(
            config.gif_frame_delay_ms(),
            Err(Error::InvalidGifRate(_))
        ));
    }
}
