// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Cosmetic per-frame effects.
//!
//! Both effects are plain functions of accumulated frame time; the render
//! loop advances them once per tick and reads the result.

/// Scale pulse played when the marker is found
#[derive(Debug, Clone)]
pub struct PulseEffect {
    /// Scale at the top of the pulse
    pub peak: f64,
    /// Time to reach the peak (and to come back down)
    pub half_period: f64,
    elapsed: Option<f64>,
}

impl PulseEffect {
    pub fn new(peak: f64, half_period: f64) -> Self {
        Self {
            peak,
            half_period: half_period.max(f64::EPSILON),
            elapsed: None,
        }
    }

    /// Start (or restart) the pulse
    pub fn trigger(&mut self) {
        self.elapsed = Some(0.0);
    }

    pub fn is_running(&self) -> bool {
        self.elapsed.is_some()
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        if let Some(elapsed) = self.elapsed {
            let next = elapsed + dt;
            self.elapsed = if next >= 2.0 * self.half_period {
                None
            } else {
                Some(next)
            };
        }
    }

    /// Current scale multiplier; exactly 1.0 when idle
    pub fn scale(&self) -> f64 {
        match self.elapsed {
            None => 1.0,
            Some(t) if t < self.half_period => lerp(1.0, self.peak, t / self.half_period),
            Some(t) => lerp(self.peak, 1.0, (t - self.half_period) / self.half_period),
        }
    }
}

impl Default for PulseEffect {
    fn default() -> Self {
        Self::new(1.2, 0.3)
    }
}

/// Record disc that spins while music plays
#[derive(Debug, Clone)]
pub struct DiscSpin {
    pub degrees_per_second: f64,
    angle: f64,
}

impl DiscSpin {
    pub fn new(degrees_per_second: f64) -> Self {
        Self {
            degrees_per_second,
            angle: 0.0,
        }
    }

    /// Advance by `dt` seconds if `spinning`
    pub fn tick(&mut self, dt: f64, spinning: bool) {
        if spinning {
            self.angle = (self.angle + self.degrees_per_second * dt).rem_euclid(360.0);
        }
    }

    /// Current rotation in degrees, within [0, 360)
    pub fn angle(&self) -> f64 {
        self.angle
    }
}

impl Default for DiscSpin {
    fn default() -> Self {
        Self::new(30.0)
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t.clamp(0.0, 1.0)
}
