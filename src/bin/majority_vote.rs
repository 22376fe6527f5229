//! Compares three classifiers and their majority vote on two
//! features of the iris data, then tunes the ensemble by grid search.
use clap::Parser;
use colored::Colorize;
use log::info;

use std::fs;
use std::path::PathBuf;

use minivotes::prelude::*;
use minivotes::research::{
    plot_decision_regions,
    plot_roc_curves,
    RocCurve,
};


#[derive(Debug, Parser)]
#[command(name = "majority-vote", version, about)]
struct Args {
    /// CSV file with a header row. Defaults to the bundled iris data.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Column that holds the labels.
    #[arg(long, default_value = "species")]
    target: String,

    /// The two feature columns to use.
    #[arg(long, value_delimiter = ',', default_value = "sepal_width,petal_length")]
    features: Vec<String>,

    /// Rows with this label are dropped.
    #[arg(long, default_value = "setosa")]
    drop_label: String,

    /// Directory for the SVG plots and the grid search results.
    #[arg(long, default_value = "plots")]
    output_dir: PathBuf,

    /// Number of cross validation folds.
    #[arg(long, default_value_t = 10)]
    folds: usize,

    /// Seed of the train/test split.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Fraction of the rows held out for testing.
    #[arg(long, default_value_t = 0.5)]
    test_size: f64,

    /// Skip drawing plots.
    #[arg(long)]
    no_plots: bool,
}


fn main() -> minivotes::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
    let args = Args::parse();

    let (sample, species) = match args.data.as_ref() {
        Some(path) => SampleReader::new()
            .file(path)
            .has_header(true)
            .target_feature(&args.target)
            .read()?,
        None => load_iris()?,
    };

    let rows = species.iter()
        .enumerate()
        .filter(|(_, label)| **label != args.drop_label)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    let columns = args.features.iter()
        .map(|name| {
            sample.features()
                .iter()
                .position(|feat| feat.name() == name)
                .ok_or_else(|| VoteError::Configuration(
                    format!("no feature named `{name}`")
                ))
        })
        .collect::<minivotes::Result<Vec<_>>>()?;

    let x = sample.subset(&rows).select(&columns)?;
    let species = rows.iter()
        .map(|&i| species[i].clone())
        .collect::<Vec<_>>();
    let (encoder, y) = LabelEncoder::fit_transform(&species)?;
    info!("{} examples, classes {:?}", y.len(), encoder.classes());

    let (x_train, x_test, y_train, y_test) = TrainTestSplit::new(&x, &y)
        .test_size(args.test_size)
        .seed(args.seed)
        .stratify(true)
        .split()?;


    // Base classifiers ----------------------------
    let pipe1 = Pipeline::builder()
        .transformer("sc", StandardScaler::new())
        .classifier("clf", LogisticRegression::new().penalty(Penalty::L2).c(0.001))
        .build()?;
    let clf2 = DecisionTreeClassifier::new()
        .max_depth(Some(1))
        .criterion(Criterion::Entropy);
    let pipe3 = Pipeline::builder()
        .transformer("sc", StandardScaler::new())
        .classifier(
            "clf",
            KNeighborsClassifier::new()
                .n_neighbors(1)
                .p(2.0)
                .metric(Metric::Minkowski),
        )
        .build()?;

    let base: Vec<Box<dyn Classifier>> = vec![
        Box::new(pipe1),
        Box::new(clf2),
        Box::new(pipe3),
    ];
    let mv_clf: MajorityVoteClassifier = MajorityVoteClassifier::new(
        base.clone(), Vote::Probability, None
    )?;
    let hard_clf: MajorityVoteClassifier = MajorityVoteClassifier::new(
        base.clone(), Vote::ClassLabel, None
    )?;

    let mut all_clf = base;
    all_clf.push(Box::new(mv_clf.clone()));
    let clf_labels = [
        "Logistic regression",
        "Decision tree",
        "KNN",
        "Majority voting",
    ];


    // Cross validation ----------------------------
    let cv = StratifiedKFold::new(args.folds);
    println!("{}", format!("{}-fold cross validation:\n", args.folds).bold());
    let scored = all_clf.iter()
        .map(|clf| clf.as_ref())
        .chain(std::iter::once(&hard_clf as &dyn Classifier))
        .zip(clf_labels.iter().copied().chain(["Majority voting (labels)"]));
    for (clf, label) in scored {
        let scores = cross_val_score(
            clf, &x_train, &y_train, &cv, Scoring::RocAuc
        )?;
        let (mean, std) = minivotes::common::utils::mean_and_std(&scores);
        println!(
            "{} [{}]",
            format!("ROC AUC: {mean:.2} (+/- {std:.2})").green(),
            label.bold(),
        );
    }
    println!();


    // ROC curves on the test part -----------------
    let mut curves: Vec<(&str, RocCurve)> = Vec::new();
    for (clf, label) in all_clf.iter().zip(clf_labels) {
        let mut model = clf.boxed_clone();
        model.fit(&x_train, &y_train)?;
        let scores = model.predict_proba(&x_test)?
            .into_iter()
            .map(|row| row.get(1).copied().unwrap_or(0.0))
            .collect::<Vec<_>>();
        let curve = roc_curve(&y_test, &scores, 1)?;
        let area = auc(&curve.fpr, &curve.tpr)?;
        println!("Test ROC AUC: {area:.2} [{label}]");
        curves.push((label, curve));
    }
    println!();

    if !args.no_plots {
        fs::create_dir_all(&args.output_dir)?;

        let refs = curves.iter()
            .map(|(label, curve)| (*label, curve))
            .collect::<Vec<_>>();
        let path = args.output_dir.join("roc.svg");
        plot_roc_curves(&path, &refs)?;
        info!("wrote {}", path.display());

        let mut scaler = StandardScaler::new();
        let mut x_train_std = scaler.fit_transform(&x_train)?;
        x_train_std.replace_names(
            ["Sepal width [standardized]", "Petal length [standardized]"]
        )?;

        let mut fitted = Vec::with_capacity(all_clf.len());
        for clf in all_clf.iter() {
            let mut model = clf.boxed_clone();
            model.fit(&x_train_std, &y_train)?;
            fitted.push(model);
        }
        let panels = fitted.iter()
            .zip(clf_labels)
            .map(|(clf, label)| (label, clf.as_ref()))
            .collect::<Vec<_>>();
        let path = args.output_dir.join("decision_regions.svg");
        plot_decision_regions(&path, &x_train_std, &y_train, &panels)?;
        info!("wrote {}", path.display());
    }


    // Parameters ----------------------------------
    println!("{}", "Parameters of the majority vote classifier:".bold());
    for (key, value) in mv_clf.get_params(true) {
        println!("  {key}: {value}");
    }
    println!();


    // Grid search ---------------------------------
    let mut grid = ParamGrid::new();
    grid.insert(
        "decisiontreeclassifier__max_depth".into(),
        vec![1_usize.into(), 2_usize.into()],
    );
    grid.insert(
        "pipeline-1__clf__C".into(),
        vec![0.001_f64.into(), 0.1_f64.into(), 100.0_f64.into()],
    );

    let mut search = GridSearchCV::new(mv_clf, grid)
        .cv(StratifiedKFold::new(args.folds))
        .scoring(Scoring::RocAuc);
    search.fit(&x_train, &y_train)?;

    let results = search.results()?;
    for i in 0..results.len() {
        println!(
            "{:.3} +/- {:.2} {}",
            results.mean_test_score[i],
            results.std_test_score[i] / 2.0,
            format_params(&results.params[i]),
        );
    }
    println!(
        "{} {}",
        "Best parameters:".bold(),
        format_params(search.best_params()?),
    );
    println!("{} {:.2}", "Accuracy:".bold(), search.best_score()?);

    if !args.no_plots {
        let path = args.output_dir.join("grid_search.json");
        fs::write(&path, results.to_json()?)?;
        info!("wrote {}", path.display());
    }

    Ok(())
}


fn format_params(params: &Params) -> String {
    let items = params.iter()
        .map(|(key, value)| format!("'{key}': {value}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{items}}}")
}
