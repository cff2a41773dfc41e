pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,  // next card
    Right, // previous card
}

/// Turns a press/release pair into a horizontal swipe.
#[derive(Debug, Clone, Copy)]
pub struct SwipeDetector {
    threshold: f32,
    start: Option<(f32, f32)>,
}

impl SwipeDetector {
    pub fn new(threshold: f32) -> Self {
        Self { threshold, start: None }
    }

    pub fn begin(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
    }

    pub fn end(&mut self, x: f32, y: f32) -> Option<SwipeDirection> {
        let (start_x, start_y) = self.start.take()?;
        classify(x - start_x, y - start_y, self.threshold)
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }
}

impl Default for SwipeDetector {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

/// Horizontal movement must dominate and exceed the threshold.
pub fn classify(dx: f32, dy: f32, threshold: f32) -> Option<SwipeDirection> {
    if dx.abs() <= dy.abs() || dx.abs() <= threshold {
        return None;
    }
    Some(if dx > 0.0 { SwipeDirection::Right } else { SwipeDirection::Left })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(-80.0, 10.0, 50.0), Some(SwipeDirection::Left));
        assert_eq!(classify(80.0, -10.0, 50.0), Some(SwipeDirection::Right));
        assert_eq!(classify(50.0, 0.0, 50.0), None);
        assert_eq!(classify(60.0, 70.0, 50.0), None);
    }

    #[test]
    fn test_detector_requires_begin() {
        let mut detector = SwipeDetector::default();
        assert_eq!(detector.end(200.0, 0.0), None);

        detector.begin(200.0, 100.0);
        assert!(detector.is_tracking());
        assert_eq!(detector.end(100.0, 110.0), Some(SwipeDirection::Left));
        assert!(!detector.is_tracking());
    }
}
