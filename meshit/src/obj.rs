//! Minimal Wavefront OBJ output.

use hgtmesh::MeshGeometry;
use std::io::{self, Write};

/// Writes `mesh` as OBJ positions, normals, and triangle faces.
///
/// OBJ indices are 1-based, and each face corner references the
/// normal with the same index as its position.
pub fn write(mut dst: impl Write, mesh: &MeshGeometry) -> io::Result<()> {
    writeln!(dst, "# {} cells", mesh.cell_count())?;
    for v in mesh.vertices() {
        writeln!(dst, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for n in mesh.normals() {
        let n = n.normalize_or_zero();
        writeln!(dst, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for [a, b, c] in mesh.triangles() {
        let (a, b, c) = (a + 1, b + 1, c + 1);
        writeln!(dst, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }
    dst.flush()
}

#[cfg(test)]
mod tests {
    use hgtmesh::{build_mesh, GeoCoord, HeightGrid, TerrainTile};

    #[test]
    fn test_write_obj() {
        let grid = HeightGrid::from_rows(vec![vec![5, 5], vec![5, 5]]).unwrap();
        let tile = TerrainTile::new(grid, GeoCoord::new(0.0, 0.0), 1.0 / 1200.0);
        let mut out = Vec::new();
        super::write(&mut out, &build_mesh(&tile)).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# 1 cells");
        assert_eq!(lines.iter().filter(|l| l.starts_with("v ")).count(), 4);
        assert_eq!(lines.iter().filter(|l| l.starts_with("vn ")).count(), 4);
        let up: Vec<f64> = lines[5]
            .trim_start_matches("vn ")
            .split(' ')
            .map(|c| c.parse().unwrap())
            .collect();
        assert_eq!(up.len(), 3);
        approx::assert_relative_eq!(up[0], 0.0);
        approx::assert_relative_eq!(up[1], 1.0);
        approx::assert_relative_eq!(up[2], 0.0);
        assert_eq!(
            lines
                .iter()
                .copied()
                .filter(|l| l.starts_with("f "))
                .collect::<Vec<_>>(),
            ["f 1//1 3//3 4//4", "f 1//1 2//2 3//3"]
        );
    }
}
