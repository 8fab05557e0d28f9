/// Aggregate learning statistics reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LearningStats {
    pub total_lessons: u32,
    pub completed_lessons: u32,
    /// Percentage in `[0, 100]`, as computed by the backend.
    pub completion_rate: f64,
    pub active_modules: u32,
}

impl LearningStats {
    /// Placeholder shown on the dashboard when the stats endpoint fails.
    #[must_use]
    pub fn dashboard_fallback() -> Self {
        Self {
            total_lessons: 6,
            completed_lessons: 0,
            completion_rate: 0.0,
            active_modules: 0,
        }
    }

    /// Completion rate rounded for display, clamped to `[0, 100]`.
    #[must_use]
    pub fn rounded_rate(&self) -> u8 {
        if !self.completion_rate.is_finite() {
            return 0;
        }
        // Clamped above, so the cast cannot truncate.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = self.completion_rate.clamp(0.0, 100.0).round() as u8;
        rounded
    }
}
