use minivotes::prelude::*;


fn binary_iris() -> (Sample, Vec<usize>) {
    let (sample, species) = load_iris().unwrap();
    let rows = (50..150).collect::<Vec<_>>();
    let sample = sample.subset(&rows).select(&[1, 2]).unwrap();
    let (_, y) = LabelEncoder::fit_transform(&species[50..]).unwrap();
    (sample, y)
}


#[test]
fn folds_partition_the_rows() {
    let target = [vec![0; 10], vec![1; 5]].concat();
    let folds = StratifiedKFold::new(5)
        .verbose(true)
        .split(&target)
        .unwrap();
    assert_eq!(folds.len(), 5);

    let mut seen = vec![0; target.len()];
    for (train, test) in folds.iter() {
        assert_eq!(test.len(), 3);
        assert_eq!(train.len() + test.len(), target.len());
        assert!(train.iter().all(|i| !test.contains(i)));

        // each fold keeps the 2:1 class ratio
        let n_pos = test.iter().filter(|&&i| target[i] == 1).count();
        assert_eq!(n_pos, 1);

        test.iter().for_each(|&i| seen[i] += 1);
    }
    assert!(seen.iter().all(|&n| n == 1));
}


#[test]
fn shuffling_is_seeded() {
    let target = [vec!["a"; 12], vec!["b"; 8]].concat();
    let cv = StratifiedKFold::new(4).shuffle(7);
    assert_eq!(cv.split(&target).unwrap(), cv.split(&target).unwrap());

    for (_, test) in cv.split(&target).unwrap() {
        assert_eq!(test.len(), 5);
        assert!(test.windows(2).all(|w| w[0] < w[1]));
    }
}


#[test]
fn invalid_fold_counts() {
    let target = [0, 1, 0, 1];
    assert!(matches!(
        StratifiedKFold::new(1).split(&target),
        Err(VoteError::Configuration(_))
    ));
    assert!(matches!(
        StratifiedKFold::new(5).split(&target),
        Err(VoteError::Configuration(_))
    ));
}


#[test]
fn cross_validated_roc_auc() {
    let (sample, y) = binary_iris();
    let cv = StratifiedKFold::new(10);

    let tree = DecisionTreeClassifier::new()
        .max_depth(Some(1))
        .criterion(Criterion::Entropy);
    let scores = cross_val_score(&tree, &sample, &y, &cv, Scoring::RocAuc)
        .unwrap();
    assert_eq!(scores.len(), 10);
    assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
    assert!(!tree.is_fitted());

    let (mean, _) = minivotes::common::utils::mean_and_std(&scores);
    assert!(mean > 0.8, "mean ROC AUC = {mean}");
}


#[test]
fn label_vote_is_scored_with_hard_predictions() {
    let (sample, y) = binary_iris();
    let ensemble: MajorityVoteClassifier = MajorityVoteBuilder::new()
        .classifier(DecisionTreeClassifier::new().max_depth(Some(1)))
        .classifier(KNeighborsClassifier::new().n_neighbors(1))
        .classifier(LogisticRegression::new())
        .build()
        .unwrap();
    assert!(!ensemble.supports_proba());

    let cv = StratifiedKFold::new(5).shuffle(1);
    let roc = cross_val_score(&ensemble, &sample, &y, &cv, Scoring::RocAuc)
        .unwrap();
    let accuracy = cross_val_score(&ensemble, &sample, &y, &cv, Scoring::Accuracy)
        .unwrap();
    assert_eq!(roc.len(), 5);
    assert_eq!(accuracy.len(), 5);
    assert!(accuracy.iter().all(|s| (0.0..=1.0).contains(s)));
}


#[test]
fn scoring_names() {
    assert_eq!("roc_auc".parse::<Scoring>().unwrap(), Scoring::RocAuc);
    assert_eq!(Scoring::Accuracy.to_string(), "accuracy");
    assert!("f1".parse::<Scoring>().is_err());
}
