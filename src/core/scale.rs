use crate::core::types::DataRange;
use crate::error::{ChartError, ChartResult};

/// Linear mapping between a data domain and a pixel interval.
///
/// The pixel interval may be reversed (`pixel_start > pixel_end`), which is
/// how value axes map larger values upward on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    pixel_start: f64,
    pixel_end: f64,
}

impl LinearScale {
    pub fn new(
        domain_start: f64,
        domain_end: f64,
        pixel_start: f64,
        pixel_end: f64,
    ) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !pixel_start.is_finite() || !pixel_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale pixel range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            pixel_start,
            pixel_end,
        })
    }

    /// Builds a scale over `range`, widening degenerate ranges by one unit.
    pub fn over_range(range: DataRange, pixel_start: f64, pixel_end: f64) -> ChartResult<Self> {
        let (start, end) = if range.span() == 0.0 {
            (range.min - 0.5, range.max + 0.5)
        } else {
            (range.min, range.max)
        };
        Self::new(start, end, pixel_start, pixel_end)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn pixel_range(self) -> (f64, f64) {
        (self.pixel_start, self.pixel_end)
    }

    pub fn domain_to_pixel(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        Ok(self.pixel_start + normalized * (self.pixel_end - self.pixel_start))
    }

    pub fn pixel_to_domain(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }
        let pixel_span = self.pixel_end - self.pixel_start;
        if pixel_span == 0.0 {
            return Err(ChartError::InvalidData(
                "scale pixel range must be non-zero".to_owned(),
            ));
        }

        let normalized = (pixel - self.pixel_start) / pixel_span;
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }

    /// Evenly spaced tick values across the domain, endpoints included.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        if count < 2 {
            return vec![self.domain_start];
        }
        let step = (self.domain_end - self.domain_start) / (count - 1) as f64;
        (0..count)
            .map(|i| self.domain_start + step * i as f64)
            .collect()
    }

    /// Round tick values inside the domain, stepping by 1, 2 or 5 times a
    /// power of ten so that roughly `target` ticks fit.
    #[must_use]
    pub fn nice_ticks(self, target: usize) -> Vec<f64> {
        let low = self.domain_start.min(self.domain_end);
        let high = self.domain_start.max(self.domain_end);
        let step = nice_step(high - low, target.max(2));
        if step <= 0.0 || !step.is_finite() {
            return vec![low];
        }

        let first = (low / step).ceil();
        let last = (high / step).floor();
        let count = (last - first).max(0.0) as usize + 1;
        (0..count)
            .map(|i| (first + i as f64) * step)
            .map(|tick| if tick.abs() < step * 1e-9 { 0.0 } else { tick })
            .collect()
    }
}

fn nice_step(span: f64, target: usize) -> f64 {
    if !span.is_finite() || span <= 0.0 {
        return 0.0;
    }
    let raw = span / target.saturating_sub(1).max(1) as f64;
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}
