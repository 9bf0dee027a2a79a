//! Group expand/collapse animation.
//!
//! A toggle interpolates the group's row-space rect (`y` = first row,
//! `height` = row count) between its collapsed and expanded extents.  Time is
//! injected through [`GroupAnimation::advance`] so the state machine can be
//! driven without a clock.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::core::tree::NodeId;

/// Default length of a toggle in milliseconds.
pub const DEFAULT_DURATION_MS: u64 = 200;

/// Which way a group is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleDirection {
    Expand,
    Collapse,
}

/// Result of advancing an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStep {
    Running,
    /// Final frame reached; the caller applies any deferred state change.
    Finished {
        node: NodeId,
        direction: ToggleDirection,
    },
}

/// One in-flight rect animation.
#[derive(Debug, Clone)]
pub struct GroupAnimation {
    pub node: NodeId,
    pub direction: ToggleDirection,
    from: Rect,
    to: Rect,
    started: Instant,
    duration: Duration,
    current: Rect,
}

impl GroupAnimation {
    pub fn new(
        node: NodeId,
        direction: ToggleDirection,
        from: Rect,
        to: Rect,
        started: Instant,
        duration: Duration,
    ) -> Self {
        Self {
            node,
            direction,
            from,
            to,
            started,
            duration,
            current: from,
        }
    }

    /// Linear progress in `0.0..=1.0` at `now`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Move to `now` and report whether the animation is done.
    pub fn advance(&mut self, now: Instant) -> AnimationStep {
        let t = self.progress(now);
        self.current = lerp_rect(self.from, self.to, t);
        if t >= 1.0 {
            AnimationStep::Finished {
                node: self.node,
                direction: self.direction,
            }
        } else {
            AnimationStep::Running
        }
    }

    /// Descendant rows of the animated node to show this frame.  The header
    /// row is part of the rect height.
    pub fn revealed_rows(&self) -> usize {
        usize::from(self.current.height.saturating_sub(1))
    }
}

fn lerp(a: u16, b: u16, t: f64) -> u16 {
    let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
    v.round().clamp(0.0, f64::from(u16::MAX)) as u16
}

/// Interpolate every field of a rect.
pub fn lerp_rect(from: Rect, to: Rect, t: f64) -> Rect {
    Rect::new(
        lerp(from.x, to.x, t),
        lerp(from.y, to.y, t),
        lerp(from.width, to.width, t),
        lerp(from.height, to.height, t),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anim(direction: ToggleDirection, from: Rect, to: Rect, t0: Instant) -> GroupAnimation {
        GroupAnimation::new(7, direction, from, to, t0, Duration::from_millis(DEFAULT_DURATION_MS))
    }

    #[test]
    fn lerp_rect_endpoints_and_midpoint() {
        let a = Rect::default();
        let b = Rect::new(0, 10, 40, 8);
        assert_eq!(lerp_rect(a, b, 0.0), a);
        assert_eq!(lerp_rect(a, b, 1.0), b);
        assert_eq!(lerp_rect(a, b, 0.5), Rect::new(0, 5, 20, 4));
    }

    #[test]
    fn collapse_runs_then_finishes() {
        let t0 = Instant::now();
        let full = Rect::new(0, 3, 30, 5);
        let mut a = anim(ToggleDirection::Collapse, full, Rect::default(), t0);
        assert_eq!(a.revealed_rows(), 4);

        match a.advance(t0 + Duration::from_millis(100)) {
            AnimationStep::Running => assert_eq!(a.revealed_rows(), 2),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            a.advance(t0 + Duration::from_millis(200)),
            AnimationStep::Finished {
                node: 7,
                direction: ToggleDirection::Collapse
            }
        );
        assert_eq!(a.revealed_rows(), 0);
    }

    #[test]
    fn expand_reveals_rows_progressively() {
        let t0 = Instant::now();
        let full = Rect::new(0, 0, 30, 9);
        let mut a = anim(ToggleDirection::Expand, Rect::default(), full, t0);
        assert_eq!(a.revealed_rows(), 0);
        a.advance(t0 + Duration::from_millis(50));
        let early = a.revealed_rows();
        a.advance(t0 + Duration::from_millis(150));
        let late = a.revealed_rows();
        assert!(early < late && late < 8);
    }

    #[test]
    fn clock_before_start_is_zero_progress() {
        let t0 = Instant::now() + Duration::from_secs(1);
        let a = anim(ToggleDirection::Expand, Rect::default(), Rect::new(0, 0, 1, 1), t0);
        assert_eq!(a.progress(Instant::now()), 0.0);
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let t0 = Instant::now();
        let mut a = GroupAnimation::new(
            1,
            ToggleDirection::Expand,
            Rect::default(),
            Rect::new(0, 0, 4, 4),
            t0,
            Duration::ZERO,
        );
        assert!(matches!(a.advance(t0), AnimationStep::Finished { .. }));
    }
}
