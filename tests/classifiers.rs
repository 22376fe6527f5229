use minivotes::prelude::*;
use polars::prelude::*;

// Toy example  (o/x are the class 1/0 examples)
//
// 15|                     |
//   |                   5 |
//   |                  x  |
//   |                     |         6
//   |                     |        x
// 10|       4             |________________________ 9.5
//   |      x              |             1
//   |                     |            o
//   |                     |
//   |                     |   0
//  5|                     |  o
//   |                     |                 2
//   |                     |                o
//   |            3        |
//   |           x         |
//   |_____________________|____________________
//  0            5         | 10            15
//                         |
//                        9.0
//


fn toy() -> (Sample, Vec<usize>) {
    let s1 = Series::new("x", &[10.0, 14.0, 15.0, 5.0, 3.0,  8.0, 12.0]);
    let s2 = Series::new("y", &[ 5.0,  8.0,  3.0, 1.0, 9.0, 13.0, 11.0]);
    let df = DataFrame::new(vec![s1, s2]).unwrap();
    let sample = Sample::from_dataframe(df).unwrap();
    (sample, vec![1, 1, 1, 0, 0, 0, 0])
}


fn iris_codes() -> (Sample, Vec<usize>) {
    let (sample, species) = load_iris().unwrap();
    let (_, y) = LabelEncoder::fit_transform(&species).unwrap();
    (sample, y)
}


#[test]
fn tree_separates_the_toy_sample() {
    let (sample, target) = toy();

    let mut tree = DecisionTreeClassifier::new()
        .criterion(Criterion::Entropy);
    tree.fit(&sample, &target).unwrap();
    println!("{tree}");

    assert_eq!(tree.predict(&sample).unwrap(), target);
    assert!(tree.depth().unwrap() <= 3);

    for row in tree.predict_proba(&sample).unwrap() {
        assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }
}


#[test]
fn stump_has_depth_one() {
    let (sample, target) = iris_codes();
    let mut stump = DecisionTreeClassifier::new()
        .max_depth(Some(1))
        .criterion(Criterion::Gini);
    stump.fit(&sample, &target).unwrap();
    assert_eq!(stump.depth(), Some(1));

    // a single split isolates setosa
    let predictions = stump.predict(&sample).unwrap();
    assert!(predictions[..50].iter().all(|&p| p == 0));
}


#[test]
fn tree_exports_dot_file() {
    let (sample, target) = toy();
    let mut tree = DecisionTreeClassifier::new().max_depth(Some(2));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tree.dot");
    assert!(tree.to_dot_file(&path).is_err());

    tree.fit(&sample, &target).unwrap();
    tree.to_dot_file(&path).unwrap();
    let dot = std::fs::read_to_string(&path).unwrap();
    assert!(dot.starts_with("graph DecisionTree {"));
    assert!(dot.contains("<="));
}


#[test]
fn one_neighbor_memorizes_the_training_sample() {
    let (sample, target) = toy();
    for weights in [NeighborWeights::Uniform, NeighborWeights::Distance] {
        let mut knn = KNeighborsClassifier::new()
            .n_neighbors(1)
            .weights(weights);
        knn.fit(&sample, &target).unwrap();
        assert_eq!(knn.predict(&sample).unwrap(), target);
    }
}


#[test]
fn neighbor_votes_are_probabilities() {
    let (sample, target) = iris_codes();
    let mut knn = KNeighborsClassifier::new()
        .n_neighbors(5)
        .metric(Metric::Manhattan);
    knn.fit(&sample, &target).unwrap();

    let proba = knn.predict_proba(&sample).unwrap();
    for row in proba.iter() {
        assert_eq!(row.len(), 3);
        assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        // 5 uniform votes
        assert!(row.iter().all(|p| (p * 5.0 - (p * 5.0).round()).abs() < 1e-9));
    }

    let too_many = KNeighborsClassifier::new().n_neighbors(151)
        .fit(&sample, &target);
    assert!(matches!(too_many, Err(VoteError::Configuration(_))));
}


#[test]
fn logistic_regression_on_a_line() {
    let sample = Sample::from_rows(&[[-2.0], [-1.0], [1.0], [2.0]]).unwrap();
    let target = [0, 0, 1, 1];

    let mut lr = LogisticRegression::new().c(10.0);
    lr.fit(&sample, &target).unwrap();

    assert_eq!(lr.predict(&sample).unwrap(), target);
    let coef = lr.coef().unwrap();
    assert_eq!(coef.len(), 1);
    assert!(coef[0][0] > 0.0);

    let proba = lr.predict_proba(&sample).unwrap();
    assert!(proba[3][1] > 0.5);
    assert!(proba[0][0] > 0.5);
    assert!(proba.iter().all(|row| (row[0] + row[1] - 1.0).abs() < 1e-12));
}


#[test]
fn multinomial_logistic_regression_on_iris() {
    let (sample, target) = iris_codes();
    let mut pipe = Pipeline::builder()
        .transformer("sc", StandardScaler::new())
        .classifier("clf", LogisticRegression::new())
        .build()
        .unwrap();
    pipe.fit(&sample, &target).unwrap();

    let proba = pipe.predict_proba(&sample).unwrap();
    assert!(proba.iter().all(|row| row.len() == 3));

    let accuracy = accuracy_score(&target, &pipe.predict(&sample).unwrap())
        .unwrap();
    assert!(accuracy > 0.8, "accuracy = {accuracy}");
}


#[test]
fn strong_regularization_flattens_probabilities() {
    let (sample, target) = toy();
    let mut lr = LogisticRegression::new().c(1e-6);
    lr.fit(&sample, &target).unwrap();

    for row in lr.predict_proba(&sample).unwrap() {
        assert!((row[1] - 0.5).abs() < 0.01);
    }
}


#[test]
fn unfitted_classifiers_refuse_to_predict() {
    let (sample, _) = toy();
    let pipe = Pipeline::builder()
        .transformer("sc", StandardScaler::new())
        .classifier("clf", KNeighborsClassifier::new())
        .build()
        .unwrap();

    let classifiers: Vec<Box<dyn Classifier>> = vec![
        Box::new(LogisticRegression::new()),
        Box::new(DecisionTreeClassifier::new()),
        Box::new(KNeighborsClassifier::new()),
        Box::new(pipe),
    ];
    for clf in classifiers {
        assert!(!clf.is_fitted());
        assert!(matches!(
            clf.predict(&sample),
            Err(VoteError::NotFitted { .. })
        ));
    }
}


#[test]
fn feature_count_is_checked() {
    let (sample, target) = toy();
    let mut tree = DecisionTreeClassifier::new();
    tree.fit(&sample, &target).unwrap();

    let narrow = sample.select(&[0]).unwrap();
    assert!(matches!(
        tree.predict(&narrow),
        Err(VoteError::ShapeMismatch { .. })
    ));
}
