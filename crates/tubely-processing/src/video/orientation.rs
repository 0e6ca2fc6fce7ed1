use tubely_core::Orientation;

pub const ASPECT_LANDSCAPE: f64 = 16.0 / 9.0;
pub const ASPECT_PORTRAIT: f64 = 9.0 / 16.0;

/// Classify a frame size against 16:9 and 9:16.
///
/// A ratio matches a target when its relative deviation `|ratio / target - 1|`
/// is within `tolerance`. Zero-sized frames are `Other`.
pub fn classify(width: u32, height: u32, tolerance: f64) -> Orientation {
    if width == 0 || height == 0 {
        return Orientation::Other;
    }

    let ratio = f64::from(width) / f64::from(height);
    if (ratio / ASPECT_LANDSCAPE - 1.0).abs() <= tolerance {
        Orientation::Landscape
    } else if (ratio / ASPECT_PORTRAIT - 1.0).abs() <= tolerance {
        Orientation::Portrait
    } else {
        Orientation::Other
    }
}
