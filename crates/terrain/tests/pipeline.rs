//! Generate, export and reload a terrain through the public API.

use std::io::BufReader;

use terrain::prelude::*;

#[test]
fn test_fractal_csv_round_trip() {
    let config = FractalConfig::default().with_size(17).with_seed(2024);
    let points = config.generate().unwrap();

    let dir = std::env::temp_dir().join(format!("terrain-pipeline-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("terrain.csv");

    export(&points, &path).unwrap();
    let file = std::fs::File::open(&path).unwrap();
    let reloaded = read_points(BufReader::new(file)).unwrap();

    assert_eq!(reloaded.len(), 17 * 17);
    assert_eq!(reloaded, points);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_manual_pipeline_matches_config() {
    let config = FractalConfig::default()
        .with_size(9)
        .with_roughness(0.2)
        .with_height_scale(60.0)
        .with_scale(AxisScale::new(2.0, 3.0, 0.5))
        .with_seed(5);

    let grid = config.heightmap().unwrap();
    assert!(grid.is_filled());

    let points = project(&grid, config.scale);
    assert_eq!(points, config.generate().unwrap());
    assert_eq!(points[9 * 9 - 1].x, 16.0);
    assert_eq!(points[9 * 9 - 1].y, 24.0);
    assert_eq!(points[0].z, grid.get(0, 0) * 0.5);
}

#[test]
fn test_trig_points_serialize() {
    let config = TrigConfig {
        samples: 10,
        seed: Some(1),
        ..Default::default()
    };
    let points = config.generate().unwrap();
    let csv = to_csv_string(&points).unwrap();
    assert_eq!(csv.lines().count(), 11);
    assert!(csv.starts_with("x,y,z\n"));
}
