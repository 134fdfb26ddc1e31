use crate::Landmark;

/// Anything with a 2D position in frame coordinates.
pub trait Point2 {
    fn x(&self) -> f32;
    fn y(&self) -> f32;
}

impl Point2 for Landmark {
    fn x(&self) -> f32 {
        self.x
    }

    fn y(&self) -> f32 {
        self.y
    }
}

impl Point2 for (f32, f32) {
    fn x(&self) -> f32 {
        self.0
    }

    fn y(&self) -> f32 {
        self.1
    }
}

/// Angle in degrees at vertex `b` between the rays `b -> a` and `b -> c`.
///
/// Uses the difference of the two ray headings, folded back into [0, 180].
/// Coincident points do not fail: `atan2(0, 0)` is 0, so the result is
/// finite even if it carries no physical meaning.
pub fn angle_at<P: Point2>(a: &P, b: &P, c: &P) -> f32 {
    let heading_c = (c.y() - b.y()).atan2(c.x() - b.x());
    let heading_a = (a.y() - b.y()).atan2(a.x() - b.x());
    let angle = (heading_c - heading_a).to_degrees().abs();

    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_is_180() {
        let angle = angle_at(&(0.0_f32, 0.0_f32), &(0.5, 0.0), &(1.0, 0.0));
        assert!((angle - 180.0).abs() < 1e-3);
    }

    #[test]
    fn right_angle() {
        let angle = angle_at(&(0.0_f32, 0.0_f32), &(0.5, 0.0), &(0.5, 0.5));
        assert!((angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn wraps_reflex_headings_into_range() {
        // Headings of -170 and +170 degrees differ by 340, which folds to 20.
        let b = (0.0_f32, 0.0_f32);
        let a = ((-170.0_f32).to_radians().cos(), (-170.0_f32).to_radians().sin());
        let c = (170.0_f32.to_radians().cos(), 170.0_f32.to_radians().sin());
        let angle = angle_at(&a, &b, &c);
        assert!((angle - 20.0).abs() < 1e-3);
    }

    #[test]
    fn stays_in_range_and_is_symmetric() {
        let points: [(f32, f32); 6] = [
            (0.1, 0.9),
            (0.4, 0.2),
            (0.8, 0.8),
            (0.5, 0.5),
            (0.0, 0.3),
            (0.9, 0.1),
        ];

        for a in &points {
            for b in &points {
                for c in &points {
                    let forward = angle_at(a, b, c);
                    let backward = angle_at(c, b, a);
                    assert!(forward.is_finite());
                    assert!((0.0..=180.0).contains(&forward), "{forward} out of range");
                    assert!((forward - backward).abs() < 1e-3);
                }
            }
        }
    }

    #[test]
    fn coincident_points_are_finite() {
        let p = (0.3_f32, 0.3_f32);
        assert_eq!(angle_at(&p, &p, &p), 0.0);
    }

    #[test]
    fn works_on_landmarks() {
        let hip = Landmark::new(0.5, 0.5, 1.0);
        let knee = Landmark::new(0.5, 0.7, 1.0);
        let ankle = Landmark::new(0.7, 0.7, 0.1).with_z(-0.2);
        assert!((angle_at(&hip, &knee, &ankle) - 90.0).abs() < 1e-3);
    }
}
