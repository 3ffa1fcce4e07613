/// A mock AI finding drawn over the media, in image pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationMarker {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub label: &'static str,
    /// Mock classifier confidence in [0.5, 1.0).
    pub confidence: f32,
}

impl AnnotationMarker {
    pub fn caption(&self) -> String {
        format!("{} {:.0}%", self.label, self.confidence * 100.0)
    }
}

const MOCK_LABELS: &[&str] = &["Normal", "ASC-US", "LSIL", "HSIL"];

/// SplitMix64 step; enough for reproducible mock placement.
fn next_u64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn next_unit(state: &mut u64) -> f32 {
    (next_u64(state) >> 40) as f32 / (1u64 << 24) as f32
}

/// Deterministic mock annotations inside a `width` x `height` image.
///
/// Markers (centre plus radius) stay inside the image bounds. The same seed
/// always yields the same markers.
pub fn mock_annotations(
    width: u32,
    height: u32,
    count: usize,
    seed: u64,
) -> Vec<AnnotationMarker> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let (w, h) = (width as f32, height as f32);
    let max_radius = (w.min(h) * 0.08).max(1.0);
    let mut state = seed;

    (0..count)
        .map(|_| {
            let radius = (max_radius * (0.5 + 0.5 * next_unit(&mut state)))
                .min(w / 2.0)
                .min(h / 2.0);
            let x = radius + (w - 2.0 * radius) * next_unit(&mut state);
            let y = radius + (h - 2.0 * radius) * next_unit(&mut state);
            let label = MOCK_LABELS[(next_u64(&mut state) % MOCK_LABELS.len() as u64) as usize];
            let confidence = 0.5 + 0.5 * next_unit(&mut state) * 0.999;
            AnnotationMarker {
                x,
                y,
                radius,
                label,
                confidence,
            }
        })
        .collect()
}
