//! ISO metric coarse thread sizes backing `MockHost::recommend_thread`.
//!
//! Host lengths are centimetres; the table is in millimetres.

use bolt_types::ThreadRecommendation;

/// Default metric thread type name.
pub const ISO_METRIC_PROFILE: &str = "ISO Metric profile";

/// Largest relative gap between a modeled diameter and the nominal size
/// that still yields a recommendation.
const MAX_RELATIVE_GAP: f64 = 0.1;

/// (nominal diameter mm, coarse pitch mm)
const ISO_COARSE: &[(f64, f64)] = &[
    (1.0, 0.25),
    (1.2, 0.25),
    (1.4, 0.3),
    (1.6, 0.35),
    (2.0, 0.4),
    (2.5, 0.45),
    (3.0, 0.5),
    (3.5, 0.6),
    (4.0, 0.7),
    (5.0, 0.8),
    (6.0, 1.0),
    (8.0, 1.25),
    (10.0, 1.5),
    (12.0, 1.75),
    (14.0, 2.0),
    (16.0, 2.0),
    (18.0, 2.5),
    (20.0, 2.5),
    (22.0, 2.5),
    (24.0, 3.0),
    (27.0, 3.0),
    (30.0, 3.5),
    (33.0, 3.5),
    (36.0, 4.0),
    (39.0, 4.0),
    (42.0, 4.5),
    (45.0, 4.5),
    (48.0, 5.0),
    (52.0, 5.0),
    (56.0, 5.5),
    (60.0, 5.5),
    (64.0, 6.0),
];

/// Recommend the nearest coarse size for a diameter given in centimetres.
pub fn recommend(diameter_cm: f64, is_internal: bool) -> Option<ThreadRecommendation> {
    if !diameter_cm.is_finite() || diameter_cm <= 0.0 {
        return None;
    }
    let diameter_mm = diameter_cm * 10.0;

    let (nominal, pitch) = ISO_COARSE.iter().copied().min_by(|a, b| {
        (a.0 - diameter_mm)
            .abs()
            .partial_cmp(&(b.0 - diameter_mm).abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    })?;

    if (nominal - diameter_mm).abs() > nominal * MAX_RELATIVE_GAP {
        return None;
    }

    Some(ThreadRecommendation {
        designation: format!("M{nominal}x{pitch}"),
        thread_class: if is_internal { "6H" } else { "6g" }.to_string(),
    })
}

/// Pitch in centimetres parsed from a designation like `M12x1.75`.
pub fn pitch_cm(designation: &str) -> Option<f64> {
    let rest = designation.strip_prefix('M')?;
    let (_, pitch) = rest.split_once('x')?;
    let pitch_mm: f64 = pitch.parse().ok()?;
    (pitch_mm > 0.0).then_some(pitch_mm / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn recommends_exact_sizes() {
        let rec = recommend(1.2, false).unwrap();
        assert_eq!(rec.designation, "M12x1.75");
        assert_eq!(rec.thread_class, "6g");

        let rec = recommend(0.5, false).unwrap();
        assert_eq!(rec.designation, "M5x0.8");
    }

    #[test]
    fn integral_pitch_has_no_fraction() {
        assert_eq!(recommend(0.6, false).unwrap().designation, "M6x1");
    }

    #[test]
    fn internal_threads_use_internal_class() {
        assert_eq!(recommend(0.8, true).unwrap().thread_class, "6H");
    }

    #[test]
    fn near_sizes_snap_to_nominal() {
        assert_eq!(recommend(0.98, false).unwrap().designation, "M10x1.5");
    }

    #[test]
    fn out_of_range_diameters_have_no_recommendation() {
        assert!(recommend(0.012, false).is_none());
        assert!(recommend(12.0, false).is_none());
        assert!(recommend(0.0, false).is_none());
        assert!(recommend(-1.0, false).is_none());
    }

    #[test]
    fn parses_pitch() {
        assert_relative_eq!(pitch_cm("M12x1.75").unwrap(), 0.175, epsilon = 1e-12);
        assert_relative_eq!(pitch_cm("M6x1").unwrap(), 0.1, epsilon = 1e-12);
        assert!(pitch_cm("1/4-20 UNC").is_none());
        assert!(pitch_cm("M5x0").is_none());
    }
}
