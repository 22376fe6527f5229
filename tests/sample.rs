use std::io::Write;

use minivotes::prelude::*;
use polars::prelude::*;


fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}


#[test]
fn sample_from_dataframe() {
    let s1 = Series::new("width", &[1.0, 2.0, 3.0]);
    let s2 = Series::new("height", &[4_i64, 5, 6]);
    let df = DataFrame::new(vec![s1, s2]).unwrap();
    let sample = Sample::from_dataframe(df).unwrap();

    assert_eq!(sample.shape(), (3, 2));
    assert_eq!(sample["height"][1], 5.0);
    assert_eq!(sample.row(2), [3.0, 6.0]);

    let part = sample.subset(&[2, 0]);
    assert_eq!(part.rows(), [[3.0, 6.0], [1.0, 4.0]]);

    let height = sample.select(&[1]).unwrap();
    assert_eq!(height.shape(), (3, 1));
    assert_eq!(height.features()[0].name(), "height");
}


#[test]
fn ragged_rows_are_rejected() {
    let rows: [&[f64]; 2] = [&[1.0, 2.0], &[3.0]];
    assert!(matches!(
        Sample::from_rows(&rows),
        Err(VoteError::ShapeMismatch { .. })
    ));
}


#[test]
fn reader_splits_off_the_target() {
    let file = write_csv(
        "a,b,class\n\
         1.0,2.0,dog\n\
         \n\
         3.5,4.0,cat\n"
    );
    let (sample, labels) = SampleReader::new()
        .file(file.path())
        .has_header(true)
        .target_feature("class")
        .read()
        .unwrap();

    assert_eq!(sample.shape(), (2, 2));
    assert_eq!(labels, ["dog", "cat"]);
    assert_eq!(sample["a"][1], 3.5);
    assert!(sample.feature("class").is_none());
}


#[test]
fn reader_reports_bad_input() {
    let file = write_csv("a,b\n1.0,2.0\n");
    let missing = SampleReader::new()
        .file(file.path())
        .has_header(true)
        .target_feature("class")
        .read();
    assert!(matches!(missing, Err(VoteError::Configuration(_))));

    let file = write_csv("a,class\n1.0,x\nabc,y\n");
    let garbage = SampleReader::new()
        .file(file.path())
        .has_header(true)
        .target_feature("class")
        .read();
    assert!(matches!(garbage, Err(VoteError::Parse { line: 3, .. })));

    let no_file = SampleReader::<&str, &str>::new()
        .target_feature("class")
        .read();
    assert!(matches!(no_file, Err(VoteError::Configuration(_))));
}


#[test]
fn stratified_split_keeps_class_proportions() {
    let (sample, labels) = load_iris().unwrap();
    let (train, test, y_train, y_test) = TrainTestSplit::new(&sample, &labels)
        .test_size(0.5)
        .seed(1)
        .stratify(true)
        .split()
        .unwrap();

    assert_eq!(train.shape(), (75, 4));
    assert_eq!(test.shape(), (75, 4));
    for species in ["setosa", "versicolor", "virginica"] {
        assert_eq!(y_test.iter().filter(|y| *y == species).count(), 25);
        assert_eq!(y_train.iter().filter(|y| *y == species).count(), 25);
    }

    let bad = TrainTestSplit::new(&sample, &labels).test_size(1.0).split();
    assert!(matches!(bad, Err(VoteError::Configuration(_))));
}


#[test]
fn label_encoder_round_trip() {
    let labels = ["versicolor", "virginica", "versicolor"];
    let (encoder, codes) = LabelEncoder::fit_transform(&labels).unwrap();
    assert_eq!(encoder.classes(), ["versicolor", "virginica"]);
    assert_eq!(codes, [0, 1, 0]);
    assert_eq!(encoder.inverse_transform(&[1, 0]).unwrap(), ["virginica", "versicolor"]);
    assert!(matches!(
        encoder.transform(&["setosa"]),
        Err(VoteError::UnknownLabel(_))
    ));
}


#[test]
fn scaler_standardizes_columns() {
    let sample = Sample::from_rows(&[[1.0, 10.0], [3.0, 10.0]]).unwrap();
    let mut scaler = StandardScaler::new();
    let scaled = scaler.fit_transform(&sample).unwrap();

    assert_eq!(scaler.means().unwrap(), [2.0, 10.0]);
    assert_eq!(scaled.rows(), [[-1.0, 0.0], [1.0, 0.0]]);
}


#[test]
fn csv_without_target() {
    let file = write_csv("1.0,2.0\n3.0,4.0\n5.0,6.0\n");
    let sample = Sample::from_csv(file.path(), false).unwrap();
    assert_eq!(sample.shape(), (3, 2));
    assert_eq!(sample.features()[1].name(), "Feat. [2]");
    assert_eq!(sample.value(2, 0), 5.0);
}


#[test]
fn features_can_be_renamed() {
    let mut sample = Sample::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    let old = sample.replace_names(["width", "height"]).unwrap();
    assert_eq!(old, ["Feat. [1]", "Feat. [2]"]);
    assert_eq!(sample["height"][1], 4.0);
    assert!(sample.feature("Feat. [1]").is_none());

    let owned = vec![String::from("w"), String::from("h")];
    sample.replace_names(&owned).unwrap();
    assert_eq!(sample.features()[0].name(), "w");

    assert!(matches!(
        sample.replace_names(["only one"]),
        Err(VoteError::ShapeMismatch { .. })
    ));
}
