use minivotes::prelude::*;


/// A classifier that predicts the same code for every row.
#[derive(Debug, Clone)]
struct Constant {
    label: usize,
    proba: Option<Vec<f64>>,
    fitted: bool,
}


impl Constant {
    fn new(label: usize) -> Self {
        Self { label, proba: None, fitted: false, }
    }


    fn with_proba(proba: Vec<f64>) -> Self {
        let label = minivotes::common::utils::argmax(&proba);
        Self { label, proba: Some(proba), fitted: false, }
    }
}


impl Classifier for Constant {
    fn name(&self) -> &str {
        "Constant"
    }


    fn fit(&mut self, _sample: &Sample, _target: &[usize]) -> minivotes::Result<()> {
        self.fitted = true;
        Ok(())
    }


    fn predict(&self, sample: &Sample) -> minivotes::Result<Vec<usize>> {
        Ok(vec![self.label; sample.shape().0])
    }


    fn supports_proba(&self) -> bool {
        self.proba.is_some()
    }


    fn predict_proba(&self, sample: &Sample) -> minivotes::Result<Vec<Vec<f64>>> {
        let proba = self.proba.clone().unwrap_or_default();
        Ok(vec![proba; sample.shape().0])
    }


    fn params(&self, _deep: bool) -> Params {
        let mut params = Params::new();
        params.insert("label".into(), self.label.into());
        params
    }


    fn set_param(&mut self, key: &str, value: &ParamValue) -> minivotes::Result<()> {
        match key {
            "label" => { self.label = value.as_usize(key)?; Ok(()) },
            _ => Err(VoteError::InvalidParameter {
                estimator: "Constant".into(),
                key: key.into(),
            }),
        }
    }


    fn boxed_clone(&self) -> Box<dyn Classifier> {
        Box::new(self.clone())
    }


    fn is_fitted(&self) -> bool {
        self.fitted
    }
}


fn one_row() -> (Sample, Vec<&'static str>) {
    let sample = Sample::from_rows(&[[0.0], [1.0]]).unwrap();
    (sample, vec!["a", "b"])
}


fn label_vote(codes: &[usize], weights: Option<Vec<f64>>)
    -> MajorityVoteClassifier<&'static str>
{
    let classifiers = codes.iter()
        .map(|&k| Box::new(Constant::new(k)) as Box<dyn Classifier>)
        .collect();
    MajorityVoteClassifier::new(classifiers, Vote::ClassLabel, weights)
        .unwrap()
}


fn iris_ensemble(vote: Vote) -> MajorityVoteClassifier<String> {
    let pipe = Pipeline::builder()
        .transformer("sc", StandardScaler::new())
        .classifier("clf", LogisticRegression::new())
        .build()
        .unwrap();
    MajorityVoteBuilder::new()
        .classifier(pipe)
        .classifier(DecisionTreeClassifier::new().max_depth(Some(2)))
        .classifier(KNeighborsClassifier::new().n_neighbors(3))
        .vote(vote)
        .build()
        .unwrap()
}


#[test]
fn weights_decide_the_label_vote() {
    let (sample, target) = one_row();

    let mut uniform = label_vote(&[0, 1, 1], Some(vec![1.0, 1.0, 1.0]));
    uniform.fit(&sample, &target).unwrap();
    assert_eq!(uniform.predict(&sample).unwrap(), ["b", "b"]);

    let mut heavy = label_vote(&[0, 1, 1], Some(vec![3.0, 1.0, 1.0]));
    heavy.fit(&sample, &target).unwrap();
    assert_eq!(heavy.predict(&sample).unwrap(), ["a", "a"]);
}


#[test]
fn ties_go_to_the_lowest_code() {
    let (sample, target) = one_row();

    for codes in [[0, 1], [1, 0]] {
        let mut ensemble = label_vote(&codes, None);
        ensemble.fit(&sample, &target).unwrap();
        assert_eq!(ensemble.predict(&sample).unwrap(), ["a", "a"]);
    }

    // both classes average to exactly 0.5
    let mut soft = MajorityVoteBuilder::new()
        .classifier(Constant::with_proba(vec![0.25, 0.75]))
        .classifier(Constant::with_proba(vec![0.75, 0.25]))
        .vote(Vote::Probability)
        .weights([2.0, 2.0])
        .build()
        .unwrap();
    soft.fit(&sample, &target).unwrap();
    let proba = soft.predict_proba(&sample).unwrap();
    assert!((proba[0][0] - 0.5).abs() < 1e-12);
    assert_eq!(soft.predict(&sample).unwrap(), ["a", "a"]);
}


#[test]
fn predictions_stay_in_the_label_domain() {
    let (sample, species) = load_iris().unwrap();
    for vote in [Vote::ClassLabel, Vote::Probability] {
        let mut ensemble = iris_ensemble(vote);
        ensemble.fit(&sample, &species).unwrap();

        let classes = ensemble.classes().unwrap().to_vec();
        assert_eq!(classes, ["setosa", "versicolor", "virginica"]);
        let predictions = ensemble.predict(&sample).unwrap();
        assert_eq!(predictions.len(), 150);
        assert!(predictions.iter().all(|p| classes.contains(p)));
    }
}


#[test]
fn label_vote_follows_a_strict_majority() {
    let (sample, species) = load_iris().unwrap();
    let mut ensemble = iris_ensemble(Vote::ClassLabel);
    ensemble.fit(&sample, &species).unwrap();

    let classes = ensemble.classes().unwrap().to_vec();
    let votes = ensemble.fitted_classifiers()
        .iter()
        .map(|clf| clf.predict(&sample).unwrap())
        .collect::<Vec<_>>();
    let predictions = ensemble.predict(&sample).unwrap();

    for (row, prediction) in predictions.iter().enumerate() {
        for k in 0..classes.len() {
            let n_votes = votes.iter().filter(|v| v[row] == k).count();
            if n_votes >= 2 {
                assert_eq!(prediction, &classes[k]);
            }
        }
    }
}


#[test]
fn averaged_probabilities_sum_to_one() {
    let (sample, species) = load_iris().unwrap();
    let mut ensemble = iris_ensemble(Vote::Probability);
    ensemble.fit(&sample, &species).unwrap();

    let proba = ensemble.predict_proba(&sample).unwrap();
    assert_eq!(proba.len(), 150);
    for row in proba {
        assert_eq!(row.len(), 3);
        assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(row.iter().all(|p| (0.0..=1.0).contains(p)));
    }
}


#[test]
fn refitting_is_deterministic() {
    let (sample, species) = load_iris().unwrap();
    let mut ensemble = iris_ensemble(Vote::Probability);

    let first = ensemble.fit(&sample, &species)
        .unwrap()
        .predict(&sample)
        .unwrap();
    let second = ensemble.fit(&sample, &species)
        .unwrap()
        .predict(&sample)
        .unwrap();
    assert_eq!(first, second);
}


#[test]
fn prototypes_are_never_fitted() {
    let (sample, species) = load_iris().unwrap();
    let mut ensemble = iris_ensemble(Vote::ClassLabel);
    ensemble.fit(&sample, &species).unwrap();

    assert!(ensemble.classifiers().iter().all(|clf| !clf.is_fitted()));
    assert!(ensemble.fitted_classifiers().iter().all(|clf| clf.is_fitted()));
    assert_eq!(ensemble.fitted_classifiers().len(), 3);
}


#[test]
fn deep_params_have_distinct_names() {
    let pipe = |c: f64| {
        Pipeline::builder()
            .transformer("sc", StandardScaler::new())
            .classifier("clf", LogisticRegression::new().c(c))
            .build()
            .unwrap()
    };
    let ensemble: MajorityVoteClassifier = MajorityVoteBuilder::new()
        .classifier(pipe(0.001))
        .classifier(DecisionTreeClassifier::new())
        .classifier(pipe(100.0))
        .build()
        .unwrap();

    assert_eq!(
        ensemble.names(),
        ["pipeline-1", "decisiontreeclassifier", "pipeline-2"]
    );

    let deep = ensemble.get_params(true);
    assert_eq!(deep["pipeline-1__clf__C"], ParamValue::Float(0.001));
    assert_eq!(deep["pipeline-2__clf__C"], ParamValue::Float(100.0));
    assert!(deep.contains_key("decisiontreeclassifier__max_depth"));
    assert!(deep.contains_key("pipeline-1__sc__with_mean"));
    assert!(matches!(deep["pipeline-2"], ParamValue::Estimator(_)));

    let shallow = ensemble.get_params(false);
    let keys = shallow.keys().map(String::as_str).collect::<Vec<_>>();
    assert_eq!(keys, ["classifiers", "vote", "weights"]);
    assert_eq!(shallow["weights"], ParamValue::Null);
}


#[test]
fn nested_params_reach_the_base_classifier() {
    let mut ensemble = iris_ensemble(Vote::ClassLabel);

    let mut params = Params::new();
    params.insert("decisiontreeclassifier__max_depth".into(), 3_usize.into());
    params.insert("pipeline__clf__C".into(), 0.1_f64.into());
    params.insert("weights".into(), ParamValue::List(vec![
        1.0_f64.into(), 2.0_f64.into(), 1.0_f64.into(),
    ]));
    ensemble.set_params(&params).unwrap();

    let deep = ensemble.get_params(true);
    assert_eq!(deep["decisiontreeclassifier__max_depth"], ParamValue::Int(3));
    assert_eq!(deep["pipeline__clf__C"], ParamValue::Float(0.1));

    let mut unknown = Params::new();
    unknown.insert("svc__C".into(), 1.0_f64.into());
    assert!(matches!(
        ensemble.set_params(&unknown),
        Err(VoteError::InvalidParameter { .. })
    ));

    let mut wrong_type = Params::new();
    wrong_type.insert("decisiontreeclassifier__max_depth".into(), "deep".into());
    assert!(matches!(
        ensemble.set_params(&wrong_type),
        Err(VoteError::ParameterType { .. })
    ));

    let mut bad_weights = Params::new();
    bad_weights.insert("weights".into(), ParamValue::List(vec![1.0_f64.into()]));
    assert!(matches!(
        ensemble.set_params(&bad_weights),
        Err(VoteError::Configuration(_))
    ));
}


#[test]
fn rejected_nested_params_are_rolled_back() {
    let (sample, species) = load_iris().unwrap();
    let (_, y) = LabelEncoder::fit_transform(&species).unwrap();

    let inner: MajorityVoteClassifier = MajorityVoteBuilder::new()
        .classifier(DecisionTreeClassifier::new().max_depth(Some(2)))
        .classifier(KNeighborsClassifier::new().n_neighbors(3))
        .vote(Vote::Probability)
        .build()
        .unwrap();
    let mut outer: MajorityVoteClassifier = MajorityVoteBuilder::new()
        .classifier(inner)
        .classifier(LogisticRegression::new())
        .vote(Vote::Probability)
        .build()
        .unwrap();
    outer.fit(&sample, &y).unwrap();
    let before = outer.get_params(true);

    // a label-vote child cannot serve a probability vote
    let mut params = Params::new();
    params.insert("majorityvoteclassifier__vote".into(), "classlabel".into());
    assert!(matches!(
        outer.set_params(&params),
        Err(VoteError::Configuration(_))
    ));

    assert_eq!(outer.get_params(true), before);
    assert_eq!(
        before["majorityvoteclassifier__vote"],
        ParamValue::Str("probability".into())
    );
    assert!(outer.classifiers()[0].supports_proba());
    assert!(Classifier::is_fitted(&outer));
    assert_eq!(outer.predict(&sample).unwrap().len(), 150);

    outer.fit(&sample, &y).unwrap();
    assert_eq!(outer.predict_proba(&sample).unwrap()[0].len(), 3);
}


#[test]
fn vote_mode_is_checked_when_replaced() {
    let (sample, target) = one_row();
    let mut ensemble = label_vote(&[0, 1, 1], None);
    ensemble.fit(&sample, &target).unwrap();

    let mut params = Params::new();
    params.insert("vote".into(), "probability".into());
    assert!(matches!(
        ensemble.set_params(&params),
        Err(VoteError::Configuration(_))
    ));
    assert_eq!(ensemble.vote(), Vote::ClassLabel);
    assert_eq!(ensemble.predict(&sample).unwrap(), ["b", "b"]);

    let mut soft = MajorityVoteBuilder::new()
        .classifier(Constant::with_proba(vec![0.25, 0.75]))
        .build::<&str>()
        .unwrap();
    soft.fit(&sample, &target).unwrap();
    soft.set_params(&params).unwrap();
    assert_eq!(soft.vote(), Vote::Probability);
    assert!(matches!(soft.predict(&sample), Err(VoteError::NotFitted { .. })));
}


#[test]
fn invalid_constructions_are_rejected() {
    let empty = MajorityVoteClassifier::<usize>::new(Vec::new(), Vote::ClassLabel, None);
    assert!(matches!(empty, Err(VoteError::Configuration(_))));

    let short = MajorityVoteBuilder::new()
        .classifier(Constant::new(0))
        .classifier(Constant::new(1))
        .weights([1.0])
        .build::<usize>();
    assert!(matches!(short, Err(VoteError::Configuration(_))));

    let negative = MajorityVoteBuilder::new()
        .classifier(Constant::new(0))
        .weights([-1.0])
        .build::<usize>();
    assert!(matches!(negative, Err(VoteError::Configuration(_))));

    let no_proba = MajorityVoteBuilder::new()
        .classifier(Constant::new(0))
        .classifier(DecisionTreeClassifier::new())
        .vote(Vote::Probability)
        .build::<usize>();
    assert!(matches!(no_proba, Err(VoteError::Configuration(_))));
}


#[test]
fn misuse_is_reported() {
    let (sample, target) = one_row();
    let mut ensemble = label_vote(&[0, 1, 1], None);

    assert!(matches!(
        ensemble.predict(&sample),
        Err(VoteError::NotFitted { .. })
    ));

    ensemble.fit(&sample, &target).unwrap();
    assert!(matches!(
        ensemble.predict_proba(&sample),
        Err(VoteError::UnsupportedOperation { .. })
    ));

    assert!(matches!(
        ensemble.fit(&sample, &["a", "a"]),
        Err(VoteError::Configuration(_))
    ));
    assert!(matches!(
        ensemble.fit(&sample, &["a"]),
        Err(VoteError::ShapeMismatch { .. })
    ));
}


#[test]
fn base_failures_carry_their_position() {
    let (sample, species) = load_iris().unwrap();
    let mut ensemble: MajorityVoteClassifier<String> = MajorityVoteBuilder::new()
        .classifier(DecisionTreeClassifier::new())
        .classifier(KNeighborsClassifier::new().n_neighbors(1_000))
        .build()
        .unwrap();

    match ensemble.fit(&sample, &species) {
        Err(VoteError::BaseClassifier { position, name, source }) => {
            assert_eq!(position, 1);
            assert_eq!(name, "kneighborsclassifier");
            assert!(matches!(*source, VoteError::Configuration(_)));
        },
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        ensemble.predict(&sample),
        Err(VoteError::NotFitted { .. })
    ));
}


#[test]
fn ensemble_is_a_classifier() {
    let (sample, species) = load_iris().unwrap();
    let (_, y) = LabelEncoder::fit_transform(&species).unwrap();

    let mut ensemble: MajorityVoteClassifier = MajorityVoteBuilder::new()
        .classifier(DecisionTreeClassifier::new().max_depth(Some(2)))
        .classifier(KNeighborsClassifier::new())
        .classifier(LogisticRegression::new())
        .vote(Vote::Probability)
        .build()
        .unwrap();

    let clf: &mut dyn Classifier = &mut ensemble;
    assert_eq!(clf.name(), "MajorityVoteClassifier");
    assert!(clf.supports_proba());
    clf.fit(&sample, &y).unwrap();
    assert!(clf.is_fitted());

    let accuracy = accuracy_score(&y, &clf.predict(&sample).unwrap()).unwrap();
    assert!(accuracy > 0.9, "accuracy = {accuracy}");
}
