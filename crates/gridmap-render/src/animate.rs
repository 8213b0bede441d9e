//! Animation clock for flowing arrows.

use gridmap_core::{ArrowSpeed, FlowDirection, FlowMode, FlowOptions};

/// Wall-clock driven animator that slides arrow fractions along their lines.
///
/// The host owns the clock: it calls [`advance`](Self::advance) with a
/// monotonic timestamp whenever a frame is due, then rebuilds the arrow
/// pass. Base fractions never change, so pausing the clock freezes every
/// arrow exactly where the schedule put it.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowAnimator {
    pub enabled: bool,
    timestamp_ms: f64,
    rate: f64,
}

impl Default for FlowAnimator {
    fn default() -> Self {
        Self { enabled: false, timestamp_ms: 0.0, rate: 0.05 }
    }
}

impl FlowAnimator {
    pub fn from_options(options: &FlowOptions) -> Self {
        Self {
            enabled: options.mode == FlowMode::AnimatedArrows,
            timestamp_ms: 0.0,
            rate: options.animation_rate,
        }
    }

    /// Records a new frame timestamp. Returns whether a redraw is needed;
    /// repeating the same timestamp is a no-op.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        if !self.enabled || now_ms == self.timestamp_ms {
            return false;
        }
        self.timestamp_ms = now_ms;
        true
    }

    pub fn timestamp_ms(&self) -> f64 {
        self.timestamp_ms
    }

    /// Where a scheduled arrow sits right now, as a fraction in [0, 1).
    ///
    /// Arrows travel toward side 2 for forward flow and toward side 1 for
    /// reverse flow, wrapping around the line. Undirected lines and a
    /// disabled animator keep the base fraction.
    pub fn animated_fraction(
        &self,
        base_fraction: f64,
        direction: FlowDirection,
        speed: ArrowSpeed,
    ) -> f64 {
        let sign = match direction {
            FlowDirection::None => return base_fraction,
            FlowDirection::FromSide1ToSide2 => 1.0,
            FlowDirection::FromSide2ToSide1 => -1.0,
        };
        if !self.enabled {
            return base_fraction;
        }
        let travelled = sign * self.rate * speed.factor() * self.timestamp_ms / 1_000.0;
        (base_fraction + travelled).rem_euclid(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animated() -> FlowAnimator {
        FlowAnimator::from_options(&FlowOptions {
            mode: FlowMode::AnimatedArrows,
            ..FlowOptions::default()
        })
    }

    #[test]
    fn advance_reports_redraws_only_for_new_timestamps() {
        let mut animator = animated();
        assert!(animator.advance(16.0));
        assert!(!animator.advance(16.0));
        assert!(animator.advance(32.0));
        assert_eq!(animator.timestamp_ms(), 32.0);

        let mut disabled = FlowAnimator::default();
        assert!(!disabled.advance(16.0));
        assert_eq!(disabled.timestamp_ms(), 0.0);
    }

    #[test]
    fn fractions_drift_with_the_clock_and_wrap() {
        let mut animator = animated();
        // rate 0.05/s, Medium factor 2.0: 0.1 fractions per second.
        animator.advance(2_000.0);

        let forward =
            animator.animated_fraction(0.5, FlowDirection::FromSide1ToSide2, ArrowSpeed::Medium);
        assert!((forward - 0.7).abs() < 1e-12);

        let reverse =
            animator.animated_fraction(0.5, FlowDirection::FromSide2ToSide1, ArrowSpeed::Medium);
        assert!((reverse - 0.3).abs() < 1e-12);

        // 0.9 + 0.2 wraps to 0.1.
        let wrapped =
            animator.animated_fraction(0.9, FlowDirection::FromSide1ToSide2, ArrowSpeed::Medium);
        assert!((wrapped - 0.1).abs() < 1e-12);
    }

    #[test]
    fn undirected_and_stopped_arrows_stay_put() {
        let mut animator = animated();
        animator.advance(60_000.0);

        assert_eq!(animator.animated_fraction(0.4, FlowDirection::None, ArrowSpeed::Fast), 0.4);
        assert_eq!(
            animator.animated_fraction(0.4, FlowDirection::FromSide1ToSide2, ArrowSpeed::Stopped),
            0.4
        );

        let frozen = FlowAnimator::default();
        assert_eq!(
            frozen.animated_fraction(0.4, FlowDirection::FromSide1ToSide2, ArrowSpeed::Fast),
            0.4
        );
    }
}
