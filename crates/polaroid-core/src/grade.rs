use serde::{Deserialize, Serialize};

/// Color-grading filter applied while drawing a photo into its slot.
///
/// Stages run in a fixed order (contrast, brightness, saturation, sepia),
/// matching the CSS filter chain of the observed reference output. All
/// parameters are multipliers/amounts where `1.0` (or `0.0` for sepia) is
/// identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub contrast: f32,
    pub brightness: f32,
    pub saturate: f32,
    pub sepia: f32,
}

impl Grade {
    pub const IDENTITY: Grade = Grade {
        contrast: 1.0,
        brightness: 1.0,
        saturate: 1.0,
        sepia: 0.0,
    };

    /// Grade one pixel. Channels are linear in `[0, 1]`.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let mut c = rgb;
        for ch in &mut c {
            *ch = (*ch - 0.5) * self.contrast + 0.5;
            *ch *= self.brightness;
        }
        // Saturation pivots around luma (Rec. 709 weights, as CSS does).
        let luma = 0.2126 * c[0] + 0.7152 * c[1] + 0.0722 * c[2];
        for ch in &mut c {
            *ch = luma + (*ch - luma) * self.saturate;
        }
        if self.sepia > 0.0 {
            let s = self.sepia;
            let [r, g, b] = c;
            let sr = 0.393 * r + 0.769 * g + 0.189 * b;
            let sg = 0.349 * r + 0.686 * g + 0.168 * b;
            let sb = 0.272 * r + 0.534 * g + 0.131 * b;
            c = [
                r + (sr - r) * s,
                g + (sg - g) * s,
                b + (sb - b) * s,
            ];
        }
        [
            c[0].clamp(0.0, 1.0),
            c[1].clamp(0.0, 1.0),
            c[2].clamp(0.0, 1.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_leaves_pixels_alone() {
        let px = [0.25, 0.5, 0.75];
        let out = Grade::IDENTITY.apply(px);
        for (a, b) in px.iter().zip(out.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn output_stays_in_unit_range() {
        let g = Grade {
            contrast: 1.4,
            brightness: 1.3,
            saturate: 2.0,
            sepia: 0.5,
        };
        for px in [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [0.9, 0.1, 0.5]] {
            let out = g.apply(px);
            for ch in out {
                assert!((0.0..=1.0).contains(&ch));
            }
        }
    }
}
