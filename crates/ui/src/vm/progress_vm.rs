/// Horizontal completion bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressBarVm {
    pub percentage: u8,
}

impl ProgressBarVm {
    /// Clamp any reported value into `[0, 100]` and round it.
    #[must_use]
    pub fn from_rate(rate: f64) -> Self {
        if !rate.is_finite() {
            return Self { percentage: 0 };
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percentage = rate.clamp(0.0, 100.0).round() as u8;
        Self { percentage }
    }

    #[must_use]
    pub fn new(percentage: u8) -> Self {
        Self {
            percentage: percentage.min(100),
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        format!("{}%", self.percentage)
    }

    /// Text rendering `[#####-----] 50%` with `width` cells.
    #[must_use]
    pub fn render(&self, width: usize) -> String {
        let filled = width * usize::from(self.percentage) / 100;
        format!(
            "[{}{}] {}",
            "#".repeat(filled),
            "-".repeat(width - filled),
            self.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_is_clamped_and_rounded() {
        assert_eq!(ProgressBarVm::from_rate(66.6).percentage, 67);
        assert_eq!(ProgressBarVm::from_rate(-3.0).percentage, 0);
        assert_eq!(ProgressBarVm::from_rate(250.0).percentage, 100);
        assert_eq!(ProgressBarVm::from_rate(f64::NAN).percentage, 0);
        assert_eq!(ProgressBarVm::new(180).percentage, 100);
    }

    #[test]
    fn render_fills_proportionally() {
        assert_eq!(ProgressBarVm::new(50).render(10), "[#####-----] 50%");
        assert_eq!(ProgressBarVm::new(0).render(4), "[----] 0%");
        assert_eq!(ProgressBarVm::new(100).render(4), "[####] 100%");
    }
}
