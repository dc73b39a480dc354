/// Axis-aligned lon/lat envelope.
///
/// The empty envelope is the `(+inf, +inf, -inf, -inf)` sentinel, so extending
/// it with any finite position yields that position's degenerate box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub const EMPTY: Self = Aabb2 {
        min: [f64::INFINITY, f64::INFINITY],
        max: [f64::NEG_INFINITY, f64::NEG_INFINITY],
    };

    /// True while nothing has been accumulated (or the box is inverted).
    pub fn is_empty(&self) -> bool {
        !(self.min[0] <= self.max[0] && self.min[1] <= self.max[1])
    }

    pub fn extend(&mut self, lon: f64, lat: f64) {
        self.min[0] = self.min[0].min(lon);
        self.min[1] = self.min[1].min(lat);
        self.max[0] = self.max[0].max(lon);
        self.max[1] = self.max[1].max(lat);
    }

    pub fn union(&self, other: &Self) -> Self {
        Aabb2 {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    /// `[min_x, min_y, max_x, max_y]`, the layout map libraries expect.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min[0], self.min[1], self.max[0], self.max[1]]
    }
}

impl Default for Aabb2 {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;

    #[test]
    fn empty_is_inverted_infinity() {
        let b = Aabb2::EMPTY;
        assert!(b.is_empty());
        assert_eq!(
            b.to_array(),
            [
                f64::INFINITY,
                f64::INFINITY,
                f64::NEG_INFINITY,
                f64::NEG_INFINITY
            ]
        );
    }

    #[test]
    fn extend_from_empty_gives_point_box() {
        let mut b = Aabb2::EMPTY;
        b.extend(84.5, 27.25);
        assert!(!b.is_empty());
        assert_eq!(
            b,
            Aabb2 {
                min: [84.5, 27.25],
                max: [84.5, 27.25]
            }
        );
    }

    #[test]
    fn union_covers_both() {
        let a = Aabb2 {
            min: [80.0, 26.0],
            max: [82.0, 28.0],
        };
        let b = Aabb2 {
            min: [81.0, 27.0],
            max: [88.0, 30.5],
        };
        assert_eq!(a.union(&b).to_array(), [80.0, 26.0, 88.0, 30.5]);
        assert_eq!(a.union(&Aabb2::EMPTY), a);
    }
}
