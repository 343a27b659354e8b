use hgtmesh::{build_mesh, read_height_grid, Elev, GeoCoord, HgtError, HgtFormat, TerrainTile};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

const DIM: usize = 1201;

/// A synthetic N49E016 tile: a cone peaking at the tile's center.
fn cone_file() -> NamedTempFile {
    let mut file = Builder::new().suffix(".hgt").tempfile().unwrap();
    let center = (DIM / 2) as f64;
    let bytes: Vec<u8> = (0..DIM * DIM)
        .map(|i| {
            let (row, col) = ((i / DIM) as f64, (i % DIM) as f64);
            let r = ((row - center).powi(2) + (col - center).powi(2)).sqrt();
            (2000.0 - r * 3.0).max(100.0) as Elev
        })
        .flat_map(Elev::to_be_bytes)
        .collect();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_file_to_mesh() {
    let file = cone_file();
    let grid = read_height_grid(file.path()).unwrap();
    assert_eq!(grid.dimension(), DIM);
    assert_eq!(grid.max_elevation(), 2000);

    let origin = GeoCoord::new(49.0, 16.0);
    let tile = TerrainTile::new(grid, origin, HgtFormat::SRTM3.angular_step());
    assert_eq!(tile.origin().elevation, Some(100.0));

    let peak = origin.offset(0.5, 0.5);
    assert_eq!(tile.height_at(peak), Some(2000));
    assert_eq!(tile.height_at(origin.offset(1.01, 0.5)), None);

    let mesh = build_mesh(&tile);
    let cells = (DIM - 1) * (DIM - 1);
    assert_eq!(mesh.vertices().len(), 4 * cells);
    assert_eq!(mesh.normals().len(), 4 * cells);
    assert_eq!(mesh.indices().len(), 6 * cells);
    let vertex_count = u32::try_from(mesh.vertices().len()).unwrap();
    assert!(mesh.indices().iter().all(|&i| i < vertex_count));
    assert!(mesh.normals().iter().all(|n| n.y > 0.0));

    // The mesh spans roughly one degree in each direction.
    let max_x = mesh.vertices().iter().map(|v| v.x).fold(f64::MIN, f64::max);
    let max_z = mesh.vertices().iter().map(|v| v.z).fold(f64::MIN, f64::max);
    assert!((70_000.0..75_000.0).contains(&max_x), "{max_x}");
    assert!((110_000.0..112_000.0).contains(&max_z), "{max_z}");
}

#[test]
fn test_load_with_origin_from_name() {
    let file = cone_file();
    let tile = TerrainTile::load(file.path(), GeoCoord::new(49.0, 16.0)).unwrap();
    assert_eq!(tile.height_at(GeoCoord::new(49.5, 16.5)), Some(2000));

    let named = tempfile::tempdir().unwrap();
    let path = named.path().join("N49E016.hgt");
    std::fs::copy(file.path(), &path).unwrap();
    let origin = GeoCoord::from_hgt_path(&path).unwrap();
    assert_eq!(origin, GeoCoord::new(49.0, 16.0));
    let tile = TerrainTile::load(&path, origin).unwrap();
    assert_eq!(tile.height_at(origin), Some(100));
}

#[test]
fn test_corrupt_files_are_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[0u8; 1201 * 2]).unwrap();
    let err = TerrainTile::load(file.path(), GeoCoord::default()).unwrap_err();
    assert!(err.is_corrupt());
    assert!(matches!(err, HgtError::CorruptFile { len: 2402, .. }));
}
