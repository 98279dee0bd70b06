//! Integration tests for whole models: assembly, persistence and concurrent queries.
//!
//! The reference model nests every profile two composites deep, with
//! offsets, rotations and weights at both levels.

use std::sync::Arc;
use std::thread;

use approx::assert_relative_eq;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use units::{Angle, Mass, SurfaceDensity, Velocity};

use lensing::arena::ModelArena;
use lensing::batch::{deflections_into, derivatives_into};
use lensing::codec;
use lensing::composite::CompositeBuilder;
use lensing::distance::LensDistance;
use lensing::lens::{Lens, LensModel, ProfileKind};
use lensing::params::LensParams;
use lensing::profiles::{MassSheetLens, NsieLens, NsisLens, PlummerLens, SieLens, SisLens};
use lensing::vector::{angular_vector_arcsec, AngularVector};

fn reference_model() -> Lens {
    let d_d = LensDistance::from_mpc(1200.0).unwrap();
    let satellites_d = LensDistance::from_mpc(1150.0).unwrap();

    let satellites = CompositeBuilder::new(satellites_d)
        .with_member(
            1.0,
            angular_vector_arcsec(0.4, -0.2),
            Angle::zero(),
            PlummerLens::new(satellites_d, Mass::from_solar_masses(5e10), Angle::from_arcsec(0.05)).unwrap(),
        )
        .with_member(
            0.6,
            angular_vector_arcsec(-0.3, 0.5),
            Angle::from_degrees(15.0),
            NsisLens::new(satellites_d, Velocity::from_km_per_sec(60.0), Angle::from_arcsec(0.02)).unwrap(),
        )
        .with_member(
            1.0,
            angular_vector_arcsec(0.1, 0.9),
            Angle::from_degrees(-40.0),
            SisLens::new(satellites_d, Velocity::from_km_per_sec(45.0)).unwrap(),
        )
        .build()
        .unwrap();

    let group = CompositeBuilder::new(d_d)
        .with_member(
            1.0,
            angular_vector_arcsec(0.05, -0.03),
            Angle::from_degrees(28.0),
            NsieLens::new(d_d, Velocity::from_km_per_sec(240.0), 0.3, Angle::from_arcsec(0.08)).unwrap(),
        )
        .with_member(1.0, angular_vector_arcsec(1.6, 0.7), Angle::from_degrees(-70.0), satellites)
        .build()
        .unwrap();

    let model = CompositeBuilder::new(d_d)
        .with_member(1.0, AngularVector::zeros(), Angle::from_degrees(5.0), group)
        .with_member(
            0.8,
            angular_vector_arcsec(-2.0, 1.1),
            Angle::from_degrees(110.0),
            SieLens::new(d_d, Velocity::from_km_per_sec(150.0), 0.45).unwrap(),
        )
        .with_member(
            1.0,
            AngularVector::zeros(),
            Angle::zero(),
            MassSheetLens::new(d_d, SurfaceDensity::from_kg_per_m2(0.15)).unwrap(),
        )
        .build()
        .unwrap();

    Lens::from(model)
}

fn sample_positions(count: usize) -> Vec<AngularVector> {
    let mut rng = ChaCha8Rng::seed_from_u64(0x1e45);
    (0..count)
        .map(|_| angular_vector_arcsec(rng.gen_range(-4.0..4.0), rng.gen_range(-4.0..4.0)))
        .collect()
}

fn kinds(params: &LensParams, found: &mut Vec<ProfileKind>) {
    found.push(params.kind());
    if let LensParams::Composite { members, .. } = params {
        for member in members {
            kinds(&member.lens, found);
        }
    }
}

#[test]
fn reference_model_contains_every_profile() {
    let params = reference_model().params();
    assert_eq!(params.depth(), 3);

    let mut found = Vec::new();
    kinds(&params, &mut found);
    for kind in ProfileKind::ALL {
        assert!(found.contains(&kind), "missing {kind}");
    }
}

#[test]
fn binary_round_trip_preserves_field() {
    let model = reference_model();
    let bytes = codec::to_bytes(&model).unwrap();
    let restored = codec::from_bytes(&bytes).unwrap();

    assert_eq!(restored, model);
    for theta in sample_positions(500) {
        assert_eq!(restored.deflection(theta).unwrap(), model.deflection(theta).unwrap());
        assert_eq!(restored.derivatives(theta).unwrap(), model.derivatives(theta).unwrap());
    }

    // Re-encoding the restored model gives the same bytes
    assert_eq!(codec::to_bytes(&restored).unwrap(), bytes);
}

#[test]
fn json_round_trip_preserves_field() {
    let model = reference_model();
    let json = model.to_json().unwrap();
    assert!(json.contains(r#""kind": "composite""#));

    let restored = Lens::from_json(&json).unwrap();
    for theta in sample_positions(200) {
        let a = model.deflection(theta).unwrap();
        let b = restored.deflection(theta).unwrap();
        assert_relative_eq!(a, b, epsilon = 1e-18, max_relative = 1e-10);
    }
}

#[test]
fn arena_assembly_matches_builder() {
    let model = reference_model();
    let Lens::Composite(root) = &model else {
        panic!("reference model is a composite");
    };

    let mut arena = ModelArena::new();
    let root_id = arena.insert_composite(model.distance()).unwrap();
    for member in root.members() {
        let id = arena.insert_shared(Arc::clone(member.lens())).unwrap();
        arena
            .add_member(root_id, member.weight(), member.offset(), member.rotation(), id)
            .unwrap();
    }
    let rebuilt = arena.build(root_id).unwrap();

    assert_eq!(rebuilt.as_ref(), &model);
}

#[test]
fn bulk_queries_match_single_queries() {
    let model = reference_model();
    let positions = sample_positions(64);
    let mut deflections = vec![0.0; 2 * positions.len()];
    let mut derivatives = vec![0.0; 3 * positions.len()];

    deflections_into(&model, &positions, &mut deflections, 0).unwrap();
    derivatives_into(&model, &positions, &mut derivatives, 0).unwrap();

    for (i, theta) in positions.iter().enumerate() {
        let alpha = model.deflection(*theta).unwrap();
        let d = model.derivatives(*theta).unwrap();
        assert_eq!([deflections[2 * i], deflections[2 * i + 1]], [alpha.x, alpha.y]);
        assert_eq!(
            [derivatives[3 * i], derivatives[3 * i + 1], derivatives[3 * i + 2]],
            [d.xx, d.yy, d.xy]
        );
    }
}

#[test]
fn concurrent_queries_agree() {
    let model = Arc::new(reference_model());
    let positions = sample_positions(256);
    let expected: Vec<AngularVector> = positions
        .iter()
        .map(|theta| model.deflection(*theta).unwrap())
        .collect();

    thread::scope(|scope| {
        for chunk in 0..4 {
            let model = Arc::clone(&model);
            let positions = &positions;
            let expected = &expected;
            scope.spawn(move || {
                for i in (chunk..positions.len()).step_by(4) {
                    assert_eq!(model.deflection(positions[i]).unwrap(), expected[i]);
                }
            });
        }
    });
}
