#![cfg(feature = "serde")]

use softring::{FeedbackConfig, Integrator, Interpolation, Profile};

#[test]
fn profile_reads_partial_asset() {
    let json = r#"{ "spring_frequency": 9.0, "use_anti_compression_strut": true, "interpolation": "Extrapolate" }"#;
    let profile: Profile<f32> = serde_json::from_str(json).unwrap();
    assert_eq!(profile.spring_frequency, 9.0);
    assert!(profile.use_anti_compression_strut);
    assert_eq!(profile.interpolation, Interpolation::Extrapolate);
    // Missing fields fall back to defaults.
    assert_eq!(profile.spring_damping_ratio, 0.8);
    assert_eq!(profile.collider_radius, 0.5);
}

#[test]
fn out_of_range_asset_is_sanitized() {
    let json = r#"{ "spring_damping_ratio": 4.0, "collider_radius": 0.0 }"#;
    let profile: Profile<f32> = serde_json::from_str(json).unwrap();
    let clean = profile.sanitized();
    assert_eq!(clean.spring_damping_ratio, 1.0);
    assert_eq!(clean.collider_radius, 0.1);
}

#[test]
fn feedback_config_survives_json() {
    let config = FeedbackConfig::<f64>::new().with_integrator(Integrator::Analytic).with_radius(2.0);
    let json = serde_json::to_string(&config).unwrap();
    let back: FeedbackConfig<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
