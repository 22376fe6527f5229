//! Small datasets bundled with this crate.
use std::io::Cursor;

use crate::error::Result;
use crate::sample::Sample;
use crate::sample::sample_struct::read_csv;


const IRIS_CSV: &str = include_str!("../data/iris.csv");


/// Loads Fisher's iris dataset.
///
/// The sample has 150 rows and the four features
/// `sepal_length`, `sepal_width`, `petal_length`, and `petal_width`.
/// The labels are the species names
/// `setosa`, `versicolor`, and `virginica`,
/// stored in blocks of 50 rows in that order.
pub fn load_iris() -> Result<(Sample, Vec<String>)> {
    let (sample, labels) = read_csv(
        Cursor::new(IRIS_CSV), true, Some("species")
    )?;
    Ok((sample, labels.unwrap_or_default()))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iris_has_three_balanced_species() {
        let (sample, labels) = load_iris().unwrap();
        assert_eq!(sample.shape(), (150, 4));
        assert_eq!(labels.len(), 150);
        assert_eq!(labels[0], "setosa");
        assert_eq!(labels[50], "versicolor");
        assert_eq!(labels[149], "virginica");
        assert_eq!(sample["petal_length"][50], 4.7);
    }
}
