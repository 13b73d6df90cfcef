mod common;

use name2gender::{
    ArtifactError, ArtifactKind, ArtifactPair, ArtifactSet, DatasetError, Gender, TrainingOptions,
    dataset, training,
};
use std::fs;

#[test]
fn test_boy_label_is_kept() {
    let csv = format!("{}liam,boy\n", common::csv());
    let data = dataset::read_records(csv.as_bytes()).unwrap();
    assert_eq!(data.len(), common::records().len() + 1);
    assert_eq!(data.dropped, 0);
    let liam = data.records.iter().find(|r| r.name == "liam").unwrap();
    assert_eq!(liam.gender, Gender::Male);

    let trained = training::train(&data.records, &TrainingOptions::default()).unwrap();
    assert_eq!(trained.train_size + trained.test_size, data.len());
}

#[test]
fn test_unknown_label_is_dropped() {
    let csv = format!("{}alex,unknown\n", common::csv());
    let data = dataset::read_records(csv.as_bytes()).unwrap();
    assert_eq!(data.len(), common::records().len());
    assert_eq!(data.dropped, 1);
    assert!(data.records.iter().all(|r| r.name != "alex"));

    let trained = training::train(&data.records, &TrainingOptions::default()).unwrap();
    assert_eq!(trained.train_size + trained.test_size, common::records().len());
}

#[test]
fn test_load_csv_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("names_dataset.csv");
    fs::write(&path, common::csv()).unwrap();

    let data = dataset::load_csv(&path).unwrap();
    assert_eq!(data.count(Gender::Female), common::FEMALE.len());
    assert_eq!(data.count(Gender::Male), common::MALE.len());

    let missing = dataset::load_csv(&dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(missing, DatasetError::Io { .. }));
}

#[test]
fn test_report_covers_test_split() {
    let trained = training::train(&common::records(), &TrainingOptions::default()).unwrap();
    let report = &trained.report;

    assert_eq!(report.predictions.len(), trained.test_size);
    assert_eq!(report.male.support + report.female.support, trained.test_size);
    assert!((0.0..=1.0).contains(&report.accuracy));
    for p in &report.predictions {
        assert!((50.0..=100.0).contains(&p.confidence));
    }

    let text = report.to_string();
    assert!(text.contains("precision"));
    assert!(text.contains("female"));
}

#[test]
fn test_training_is_deterministic() {
    let options = TrainingOptions {
        seed: 1234,
        ..TrainingOptions::default()
    };
    let a = training::train(&common::records(), &options).unwrap();
    let b = training::train(&common::records(), &options).unwrap();

    assert_eq!(a.predictor.vectorizer(), b.predictor.vectorizer());
    assert_eq!(a.report, b.report);

    let dir = tempfile::tempdir().unwrap();
    let pair_a = ArtifactPair::new(dir.path().join("a_vec.msgpack"), dir.path().join("a_clf.msgpack"));
    let pair_b = ArtifactPair::new(dir.path().join("b_vec.msgpack"), dir.path().join("b_clf.msgpack"));
    pair_a.save(&a.predictor).unwrap();
    pair_b.save(&b.predictor).unwrap();
    assert_eq!(
        fs::read(&pair_a.vectorizer).unwrap(),
        fs::read(&pair_b.vectorizer).unwrap()
    );

    for name in ["tina", "oscar", "Zzxqplm", "rosalind", "teodor"] {
        assert_eq!(a.predictor.predict(name).unwrap(), b.predictor.predict(name).unwrap());
    }
}

#[test]
fn test_saved_artifacts_reproduce_evaluation() {
    let trained = training::train(&common::records(), &TrainingOptions::default()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let set = ArtifactSet {
        primary: ArtifactPair::new(
            dir.path().join("vectorizer_clean.msgpack"),
            dir.path().join("gender_model_clean.msgpack"),
        ),
        fallback: ArtifactPair::new(
            dir.path().join("vectorizer.msgpack"),
            dir.path().join("gender_model.msgpack"),
        ),
    };
    set.primary.save(&trained.predictor).unwrap();

    let (loaded, kind) = set.load().unwrap();
    assert_eq!(kind, ArtifactKind::Primary);
    assert_eq!(loaded.vectorizer(), trained.predictor.vectorizer());

    assert!(!trained.report.predictions.is_empty());
    for p in &trained.report.predictions {
        let again = loaded.classify(&p.name).unwrap();
        assert_eq!(again.gender, p.predicted, "{}", p.name);
        assert!((again.confidence - p.confidence).abs() < 1e-9, "{}", p.name);
    }
}

#[test]
fn test_fallback_pair_used_when_primary_missing() {
    let trained = training::train(&common::records(), &TrainingOptions::default()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let set = ArtifactSet {
        primary: ArtifactPair::new(dir.path().join("clean_vec"), dir.path().join("clean_clf")),
        fallback: ArtifactPair::new(dir.path().join("vec"), dir.path().join("clf")),
    };
    set.fallback.save(&trained.predictor).unwrap();

    let (loaded, kind) = set.load().unwrap();
    assert_eq!(kind, ArtifactKind::Fallback);
    assert_eq!(
        loaded.predict("Tanya").unwrap(),
        trained.predictor.predict("Tanya").unwrap()
    );
}

#[test]
fn test_mismatched_primary_falls_back() {
    let full = training::train(&common::records(), &TrainingOptions::default()).unwrap();
    let small = training::fit(
        &[
            name2gender::NameRecord::new("ada", Gender::Female),
            name2gender::NameRecord::new("bo", Gender::Male),
        ],
        1.0,
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let set = ArtifactSet {
        primary: ArtifactPair::new(dir.path().join("clean_vec"), dir.path().join("clean_clf")),
        fallback: ArtifactPair::new(dir.path().join("vec"), dir.path().join("clf")),
    };
    // vectorizer from one model, classifier from another
    set.primary.save(&full.predictor).unwrap();
    let stray = ArtifactPair::new(dir.path().join("stray_vec"), set.primary.classifier.clone());
    stray.save(&small).unwrap();

    assert!(matches!(
        set.primary.load(),
        Err(ArtifactError::ShapeMismatch { .. })
    ));

    set.fallback.save(&small).unwrap();
    let (_, kind) = set.load().unwrap();
    assert_eq!(kind, ArtifactKind::Fallback);
}
