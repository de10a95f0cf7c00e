use engagement_synth::config::{CtrConfig, DayBand, Perturbation};
use engagement_synth::series::{realized_ctr, ImpressionCtrDeriver};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[test]
fn stored_ctr_matches_the_integer_pair() {
    let config = CtrConfig::default();
    let deriver = ImpressionCtrDeriver::new(&config).expect("valid config");
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    for day_index in 0..30 {
        let day_views: u64 = rng.gen_range(0..200_000);
        let (impressions, ctr) = deriver
            .derive(day_views, day_index, &mut rng)
            .expect("derive");
        assert!((0.0..=1.0).contains(&ctr), "ctr {ctr} out of range");
        assert!(impressions >= day_views);
        assert_eq!(ctr, realized_ctr(day_views, impressions));
    }
}

#[test]
fn zero_views_yield_zero_ctr() {
    let config = CtrConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let (impressions, ctr) = ImpressionCtrDeriver::new(&config)
        .expect("valid config")
        .derive(0, 0, &mut rng)
        .expect("derive");
    assert_eq!(impressions, 0);
    assert_eq!(ctr, 0.0);
}

#[test]
fn non_positive_target_falls_back_to_multiplier() {
    let config = CtrConfig {
        bands: vec![DayBand::new(0, 0.0, 0.0)],
        swing: Perturbation::disabled(),
        fallback_impression_multiplier: 10,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let (impressions, ctr) = ImpressionCtrDeriver::new(&config)
        .expect("valid config")
        .derive(250, 4, &mut rng)
        .expect("derive");
    assert_eq!(impressions, 2_500);
    assert_eq!(ctr, 0.1);
}

#[test]
fn target_ctr_is_capped_at_one() {
    let config = CtrConfig {
        bands: vec![DayBand::new(0, 0.9, 1.0)],
        swing: Perturbation::new(1.0, 2.0, 2.0),
        fallback_impression_multiplier: 10,
    };
    let deriver = ImpressionCtrDeriver::new(&config).expect("valid config");
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let (impressions, ctr) = deriver.derive(1_000, 0, &mut rng).expect("derive");
    assert_eq!(impressions, 1_000);
    assert_eq!(ctr, 1.0);
}

#[test]
fn realized_ctr_rounds_to_four_places_and_is_stable() {
    assert_eq!(realized_ctr(1, 3), 0.3333);
    assert_eq!(realized_ctr(2, 3), 0.6667);
    assert_eq!(realized_ctr(5, 0), 0.0);
    assert_eq!(realized_ctr(1, 3), realized_ctr(1, 3));
}
