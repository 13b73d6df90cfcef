mod common;

use name2gender::overrides::{self, OVERRIDE_CONFIDENCE};
use name2gender::service::TOO_SHORT_MESSAGE;
use name2gender::{
    Gender, GenderService, MemoryStore, NameRecord, PredictError, PredictResponse,
    PredictionRecord, PredictionResult, PredictionSource, PredictionStore, Predictor, StoreError,
    TrainingOptions, training,
};
use std::sync::Arc;

fn predictor() -> Predictor {
    training::fit(&common::records(), 1.0).unwrap()
}

#[test]
fn test_john_hits_override() {
    let r = predictor().predict("John").unwrap();
    assert_eq!(r.name, "john");
    assert_eq!(r.gender, Gender::Male);
    assert_eq!(r.confidence, 95.0);
    assert_eq!(r.source, PredictionSource::Override);
}

#[test]
fn test_overrides_ignore_the_classifier() {
    // A model that has learned the opposite answers for the override names.
    let mut records = common::records();
    for (name, gender) in overrides::entries() {
        let flipped = match gender {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        };
        for _ in 0..20 {
            records.push(NameRecord::new(*name, flipped));
        }
    }
    let contrarian = training::fit(&records, 1.0).unwrap();

    for p in [predictor(), contrarian] {
        for (name, gender) in overrides::entries() {
            let r = p.predict(name).unwrap();
            assert_eq!(r.gender, *gender);
            assert_eq!(r.confidence, OVERRIDE_CONFIDENCE);
        }
    }
}

#[test]
fn test_short_names_rejected() {
    let p = predictor();
    for raw in [" a", "", "   ", "x", "\tB\n"] {
        assert_eq!(p.predict(raw), Err(PredictError::InputTooShort { min: 2 }), "{raw:?}");
    }
}

#[test]
fn test_confidence_range() {
    let p = predictor();
    let mut names: Vec<String> = common::FEMALE
        .iter()
        .chain(common::MALE)
        .map(|n| n.to_string())
        .collect();
    names.extend(["Zzxqplm", "Bartholomew", "Annabella Rosa", "ab", "Ngozi"].map(String::from));

    for name in names {
        let r = p.predict(&name).unwrap();
        assert!((50.0..=100.0).contains(&r.confidence), "{name}: {}", r.confidence);
        assert!(matches!(r.gender, Gender::Male | Gender::Female));
    }
}

#[test]
fn test_long_names_still_classify() {
    let p = predictor();
    let long_names = [
        "tina ".repeat(30),
        "annabella".repeat(15),
        "oscar victor fred ".repeat(8),
    ];

    for name in &long_names {
        assert!(name.trim().chars().count() >= 100);
        let r = p.predict(name).unwrap();
        assert_eq!(r.source, PredictionSource::Model);
        assert!((50.0..=100.0).contains(&r.confidence), "{}", r.confidence);

        let d = p.distribution(&name.trim().to_lowercase()).unwrap();
        assert!((d.male + d.female - 1.0).abs() < 1e-9);
    }

    assert_eq!(p.predict(&long_names[0]).unwrap().gender, Gender::Female);
    assert_eq!(p.predict(&long_names[2]).unwrap().gender, Gender::Male);

    let service = GenderService::new(Arc::new(p), MemoryStore::new());
    assert!(service.handle(&long_names[0]).result().is_some());
}

#[test]
fn test_case_and_whitespace_variants_agree() {
    let p = predictor();
    for group in [["Tina", " tina ", "TINA"], ["John", "john\n", " JoHn"], ["Victor", "victor", "VICTOR  "]] {
        let first = p.predict(group[0]).unwrap();
        for variant in &group[1..] {
            assert_eq!(p.predict(variant).unwrap(), first);
        }
        assert_eq!(p.predict(group[0]).unwrap(), first);
    }
}

#[test]
fn test_unseen_name_returns_prior() {
    let trained = training::train(&common::records(), &TrainingOptions::default()).unwrap();
    let p = &trained.predictor;

    // 15 female / 10 male, 20% of each held out: 12 / 8 remain for training.
    assert_eq!(p.classifier().class_count(Gender::Female), 12);
    assert_eq!(p.classifier().class_count(Gender::Male), 8);

    assert!(p.vectorizer().count_ngrams("zzxqplm").is_empty());
    let r = p.predict("Zzxqplm").unwrap();
    assert_eq!(r.source, PredictionSource::Model);
    assert_eq!(r.gender, Gender::Female);
    assert_eq!(r.confidence, 60.0);

    let priors = p.classifier().priors();
    let reference = (priors.max() * 100.0 * 100.0).round() / 100.0;
    assert_eq!(r.confidence, reference);
}

#[test]
fn test_concurrent_predictions_share_one_predictor() {
    let p = Arc::new(predictor());
    let expected = p.predict("hanna").unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let p = Arc::clone(&p);
            std::thread::spawn(move || p.predict("Hanna").unwrap())
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

#[test]
fn test_service_stores_successful_predictions() {
    let service = GenderService::new(Arc::new(predictor()), MemoryStore::new());

    let response = service.handle("  Mary ");
    let result = response.result().unwrap();
    assert_eq!(result.gender, Gender::Female);
    assert!(response.error().is_none());

    let records = service.store().records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "mary");
    assert_eq!(records[0].predicted_gender, "female");
    assert_eq!(records[0].confidence, 95.0);
}

#[test]
fn test_service_rejects_without_storing() {
    let service = GenderService::new(Arc::new(predictor()), MemoryStore::new());

    let response = service.handle(" a");
    assert_eq!(response.error(), Some(TOO_SHORT_MESSAGE));
    assert!(response.result().is_none());
    assert!(service.store().records().unwrap().is_empty());
}

struct BrokenStore;

impl PredictionStore for BrokenStore {
    fn save(&self, _: &PredictionResult) -> Result<PredictionRecord, StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk on fire")))
    }
}

#[test]
fn test_store_failure_is_reported_inline() {
    let service = GenderService::new(Arc::new(predictor()), BrokenStore);

    let response = service.handle("tina");
    match &response {
        PredictResponse::Failed { message } => assert!(message.contains("disk on fire")),
        other => panic!("expected failure, got {other:?}"),
    }

    // the predictor is untouched and keeps working
    assert!(service.predictor().predict("tina").is_ok());
}

#[test]
fn test_response_serializes_with_status_tag() {
    let service = GenderService::new(Arc::new(predictor()), MemoryStore::new());

    let ok = serde_json::to_value(service.handle("john")).unwrap();
    assert_eq!(ok["status"], "predicted");
    assert_eq!(ok["gender"], "male");
    assert_eq!(ok["confidence"], 95.0);

    let failed = serde_json::to_value(service.handle("j")).unwrap();
    assert_eq!(failed["status"], "failed");
    assert_eq!(failed["message"], TOO_SHORT_MESSAGE);
    assert!(failed.get("gender").is_none());
}
