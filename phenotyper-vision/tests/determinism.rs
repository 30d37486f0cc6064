//! Randomized landmark sets: the engine must be deterministic and total.

use std::sync::Arc;
use std::thread;

use phenotyper_vision::{measure, ImageDimensions, LandmarkSet, MeasurementReport, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_face(rng: &mut StdRng) -> LandmarkSet {
    let points = (0..468)
        .map(|_| Point::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
        .collect();
    LandmarkSet::new(points).unwrap()
}

#[test]
fn repeated_calls_are_bit_identical() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let face = random_face(&mut rng);
        let dims = ImageDimensions::new(rng.gen_range(1..2000), rng.gen_range(1..2000));
        let a = serde_json::to_string(&MeasurementReport::from_detection(Some(&face), dims)).unwrap();
        let b = serde_json::to_string(&MeasurementReport::from_detection(Some(&face), dims)).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn outputs_are_finite_and_rounded() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let face = random_face(&mut rng);
        let phenotype = measure(&face, ImageDimensions::new(640, 480));
        for m in &phenotype.measurements {
            assert!(m.value.is_finite() && m.value >= 0.0);
            let scaled = m.value * 1e4;
            let tolerance = 1e-6 * scaled.abs().max(1.0);
            assert!((scaled - scaled.round()).abs() < tolerance, "{} not rounded", m.value);
        }
        assert!(phenotype.face_ratio_pct.is_finite());
        assert!(phenotype.nose_ratio_pct.is_finite());
    }
}

#[test]
fn concurrent_callers_agree() {
    let mut rng = StdRng::seed_from_u64(1234);
    let face = Arc::new(random_face(&mut rng));
    let dims = ImageDimensions::new(1024, 768);
    let expected = measure(&face, dims);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let face = Arc::clone(&face);
            thread::spawn(move || measure(&face, dims))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
