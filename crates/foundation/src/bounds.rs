/// Axis-aligned bounding box in lon/lat degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Closed-interval overlap: boxes sharing only an edge or a corner intersect.
    pub fn intersects(&self, other: &Aabb2) -> bool {
        self.min[0] <= other.max[0]
            && other.min[0] <= self.max[0]
            && self.min[1] <= other.max[1]
            && other.min[1] <= self.max[1]
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;

    #[test]
    fn overlapping_boxes_intersect() {
        let a = Aabb2::new([0.0, 0.0], [2.0, 2.0]);
        let b = Aabb2::new([1.0, 1.0], [3.0, 3.0]);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn touching_edges_intersect() {
        let a = Aabb2::new([0.0, 0.0], [1.0, 1.0]);
        let b = Aabb2::new([1.0, 0.5], [2.0, 2.0]);
        assert!(a.intersects(&b));
    }

    #[test]
    fn disjoint_boxes_do_not_intersect() {
        let a = Aabb2::new([0.0, 0.0], [1.0, 1.0]);
        let b = Aabb2::new([1.5, 0.0], [2.0, 1.0]);
        let c = Aabb2::new([0.0, 1.01], [1.0, 2.0]);
        assert!(!a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
