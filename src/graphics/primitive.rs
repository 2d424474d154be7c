/// Topology of a vertex stream handed to a draw call
///
/// Every topology is decomposed on the CPU into one indexed triangle list
/// before submission, so all GPU back ends rasterize identical geometry
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    /// Independent triangles: vertices are consumed three at a time
    #[default]
    Triangles,
    /// Connected triangles sharing an edge: `(i, i+1, i+2)` for each i
    TriangleStrip,
    /// Triangles radiating from vertex 0: `(0, i, i+1)` for each i
    TriangleFan,
    /// Independent quads: each group of 4 splits into `(0,1,2)` & `(1,2,3)`
    Quads,
}

/// Appends the triangle-list indices for `vertex_count` vertices of the
/// given topology into `out`
///
/// Incomplete trailing primitives (a lone strip vertex, a half quad) are
/// dropped. The decomposition rules are fixed & deterministic
pub(crate) fn triangulate(kind: PrimitiveType, vertex_count: usize, out: &mut Vec<u16>) {
    let n = vertex_count as u16;
    match kind {
        PrimitiveType::Triangles => {
            out.extend(0..n - n % 3);
        }
        PrimitiveType::TriangleStrip => {
            for i in 0..n.saturating_sub(2) {
                out.extend([i, i + 1, i + 2]);
            }
        }
        PrimitiveType::TriangleFan => {
            for i in 1..n.saturating_sub(1) {
                out.extend([0, i, i + 1]);
            }
        }
        PrimitiveType::Quads => {
            for q in 0..n / 4 {
                let base = q * 4;
                out.extend([base, base + 1, base + 2, base + 1, base + 2, base + 3]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(kind: PrimitiveType, count: usize) -> Vec<u16> {
        let mut out = Vec::new();
        triangulate(kind, count, &mut out);
        out
    }

    #[test]
    fn triangles_pass_through_dropping_remainder() {
        assert_eq!(indices(PrimitiveType::Triangles, 6), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(indices(PrimitiveType::Triangles, 5), vec![0, 1, 2]);
    }

    #[test]
    fn strip_of_five_decomposes_in_order() {
        assert_eq!(
            indices(PrimitiveType::TriangleStrip, 5),
            vec![0, 1, 2, 1, 2, 3, 2, 3, 4]
        );
    }

    #[test]
    fn fan_of_five_radiates_from_first_vertex() {
        assert_eq!(
            indices(PrimitiveType::TriangleFan, 5),
            vec![0, 1, 2, 0, 2, 3, 0, 3, 4]
        );
    }

    #[test]
    fn quad_splits_into_two_triangles_per_group() {
        assert_eq!(indices(PrimitiveType::Quads, 4), vec![0, 1, 2, 1, 2, 3]);
        assert_eq!(
            indices(PrimitiveType::Quads, 8),
            vec![0, 1, 2, 1, 2, 3, 4, 5, 6, 5, 6, 7]
        );
        // trailing half quad is dropped
        assert_eq!(indices(PrimitiveType::Quads, 6), vec![0, 1, 2, 1, 2, 3]);
    }

    #[test]
    fn degenerate_counts_yield_nothing() {
        for kind in [
            PrimitiveType::Triangles,
            PrimitiveType::TriangleStrip,
            PrimitiveType::TriangleFan,
            PrimitiveType::Quads,
        ] {
            assert!(indices(kind, 0).is_empty());
            assert!(indices(kind, 1).is_empty());
            assert!(indices(kind, 2).is_empty());
        }
    }
}
