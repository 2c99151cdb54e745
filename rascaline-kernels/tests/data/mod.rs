#![allow(dead_code)]

use ndarray::Array2;

#[derive(serde::Deserialize)]
pub struct BesselReference {
    pub max_angular: usize,
    pub reference_points: Vec<f64>,
    pub distance: f64,
    pub scale: f64,
    pub values: Vec<Vec<f64>>,
    pub gradients: Vec<Vec<f64>>,
}

#[derive(serde::Deserialize)]
struct BesselReferenceFile {
    cases: Vec<BesselReference>,
}

pub fn load_bessel_reference(path: &str) -> Vec<BesselReference> {
    let json = std::fs::read_to_string(format!("tests/data/{}", path))
        .expect("failed to read reference file");

    let file: BesselReferenceFile = serde_json::from_str(&json).expect("failed to parse JSON");
    return file.cases;
}

pub fn to_array(data: &[Vec<f64>]) -> Array2<f64> {
    let n_columns = data.first().map_or(0, |row| row.len());
    let mut array = Array2::from_elem((data.len(), n_columns), 0.0);
    for (i, row) in data.iter().enumerate() {
        assert_eq!(row.len(), n_columns, "all rows must have the same size");
        for (j, &value) in row.iter().enumerate() {
            array[[i, j]] = value;
        }
    }
    return array;
}
