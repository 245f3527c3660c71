//! Tests the aspect-ratio classifier decision table and its stability.

use panoweave_core::{AspectRatioClassifier, ProjectionClassifier, ProjectionFormat};

#[test]
fn classifier_tests_match_decision_table() {
    let classifier = AspectRatioClassifier;

    assert_eq!(
        classifier.classify(2000, 1000),
        ProjectionFormat::Equirectangular
    );
    assert_eq!(classifier.classify(1000, 1000), ProjectionFormat::Fisheye);
    assert_eq!(
        classifier.classify(6000, 1000),
        ProjectionFormat::HorizontalCubemapStrip
    );
    assert_eq!(
        classifier.classify(3000, 1000),
        ProjectionFormat::PerspectiveOrOther
    );
}

#[test]
fn classifier_tests_first_match_wins_on_band_boundaries() {
    let classifier = AspectRatioClassifier;

    // Inclusive band edges.
    assert_eq!(
        classifier.classify(1900, 1000),
        ProjectionFormat::Equirectangular
    );
    assert_eq!(
        classifier.classify(2100, 1000),
        ProjectionFormat::Equirectangular
    );
    assert_eq!(classifier.classify(900, 1000), ProjectionFormat::Fisheye);
    assert_eq!(classifier.classify(1100, 1000), ProjectionFormat::Fisheye);

    // 5.5 itself is outside the strip band.
    assert_eq!(
        classifier.classify(5500, 1000),
        ProjectionFormat::PerspectiveOrOther
    );
}

#[test]
fn classifier_tests_repeated_calls_are_stable() {
    let classifier = AspectRatioClassifier;
    for _ in 0..16 {
        assert_eq!(classifier.classify(1024, 512), ProjectionFormat::Equirectangular);
        assert_eq!(classifier.classify(777, 512), ProjectionFormat::PerspectiveOrOther);
    }
}
