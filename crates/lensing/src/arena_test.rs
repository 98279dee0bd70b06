use std::sync::Arc;

use units::{Angle, Length, Velocity};

use crate::arena::{LensId, ModelArena};
use crate::distance::LensDistance;
use crate::error::{LensError, Result};
use crate::lens::{Lens, LensModel};
use crate::params::LensParams;
use crate::profiles::SisLens;
use crate::vector::{angular_vector_arcsec, AngularVector};

fn d_d() -> LensDistance {
    LensDistance::from_mpc(900.0).unwrap()
}

fn sis() -> SisLens {
    SisLens::new(d_d(), Velocity::from_km_per_sec(180.0)).unwrap()
}

fn place(arena: &mut ModelArena, composite: LensId, member: LensId) -> Result<()> {
    arena.add_member(composite, 1.0, AngularVector::zeros(), Angle::zero(), member)
}

#[test]
fn test_rejects_self_membership() {
    let mut arena = ModelArena::new();
    let composite = arena.insert_composite(d_d()).unwrap();

    let result = place(&mut arena, composite, composite);
    assert!(matches!(
        result,
        Err(LensError::CyclicComposition { composite: c, member: m }) if c == composite.raw() && m == composite.raw()
    ));
}

#[test]
fn test_rejects_indirect_cycle() {
    let mut arena = ModelArena::new();
    let a = arena.insert_composite(d_d()).unwrap();
    let b = arena.insert_composite(d_d()).unwrap();
    let c = arena.insert_composite(d_d()).unwrap();

    place(&mut arena, a, b).unwrap();
    place(&mut arena, b, c).unwrap();

    assert!(matches!(
        place(&mut arena, c, a),
        Err(LensError::CyclicComposition { .. })
    ));
    // Diamonds are fine: a -> c directly as well as via b
    place(&mut arena, a, c).unwrap();
}

#[test]
fn test_rejected_member_leaves_arena_unchanged() {
    let mut arena = ModelArena::new();
    let leaf = arena.insert(sis()).unwrap();
    let outer = arena.insert_composite(d_d()).unwrap();
    let inner = arena.insert_composite(d_d()).unwrap();
    place(&mut arena, inner, leaf).unwrap();
    place(&mut arena, outer, inner).unwrap();

    assert!(place(&mut arena, inner, outer).is_err());

    let built = arena.build(inner).unwrap();
    match built.as_ref() {
        Lens::Composite(composite) => assert_eq!(composite.len(), 1),
        other => panic!("expected a composite, got {other:?}"),
    }
}

#[test]
fn test_rejects_unknown_and_finished_targets() {
    let mut arena = ModelArena::new();
    let leaf = arena.insert(sis()).unwrap();
    let composite = arena.insert_composite(d_d()).unwrap();

    let mut other = ModelArena::new();
    other.insert(sis()).unwrap();
    other.insert(sis()).unwrap();
    let foreign = other.insert(sis()).unwrap();

    assert!(matches!(
        place(&mut arena, composite, foreign),
        Err(LensError::InvalidParameter { name: "lens_id", .. })
    ));
    assert!(matches!(
        place(&mut arena, leaf, composite),
        Err(LensError::InvalidParameter { name: "composite", .. })
    ));
    assert!(matches!(arena.build(foreign), Err(LensError::InvalidParameter { .. })));
}

#[test]
fn test_rejects_non_finite_weight() {
    let mut arena = ModelArena::new();
    let leaf = arena.insert(sis()).unwrap();
    let composite = arena.insert_composite(d_d()).unwrap();

    let result = arena.add_member(composite, f64::NAN, AngularVector::zeros(), Angle::zero(), leaf);
    assert!(matches!(result, Err(LensError::InvalidParameter { name: "weight", .. })));
}

#[test]
fn test_build_matches_builder_semantics() {
    let mut arena = ModelArena::new();
    let leaf = arena.insert(sis()).unwrap();
    let composite = arena.insert_composite(d_d()).unwrap();
    arena
        .add_member(composite, 0.5, angular_vector_arcsec(0.3, 0.0), Angle::from_degrees(20.0), leaf)
        .unwrap();

    let model = arena.build(composite).unwrap();
    let theta = angular_vector_arcsec(1.3, 0.0);
    let direct = sis().deflection(angular_vector_arcsec(1.0, 0.0)).unwrap();

    // SIS is round, so the rotation only turns the deflection back onto the x axis
    let alpha = model.deflection(theta).unwrap();
    approx::assert_relative_eq!(alpha.x, 0.5 * direct.x, max_relative = 1e-9);
    approx::assert_relative_eq!(alpha.y, 0.0, epsilon = 1e-18);
}

#[test]
fn test_shared_subtree_built_once() {
    let mut arena = ModelArena::new();
    let leaf = arena.insert(sis()).unwrap();
    let inner = arena.insert_composite(d_d()).unwrap();
    let outer = arena.insert_composite(d_d()).unwrap();
    place(&mut arena, inner, leaf).unwrap();
    place(&mut arena, outer, inner).unwrap();
    arena
        .add_member(outer, 1.0, angular_vector_arcsec(2.0, 0.0), Angle::zero(), inner)
        .unwrap();

    let model = arena.build(outer).unwrap();
    let Lens::Composite(composite) = model.as_ref() else {
        panic!("expected a composite");
    };
    let members = composite.members();
    assert_eq!(members.len(), 2);
    assert!(Arc::ptr_eq(members[0].lens(), members[1].lens()));
}

#[test]
fn test_drafts_stay_open_after_build() {
    let mut arena = ModelArena::new();
    let leaf = arena.insert(sis()).unwrap();
    let composite = arena.insert_composite(d_d()).unwrap();

    let empty = arena.build(composite).unwrap();
    place(&mut arena, composite, leaf).unwrap();
    let filled = arena.build(composite).unwrap();

    let theta = angular_vector_arcsec(1.0, 1.0);
    assert_eq!(empty.deflection(theta).unwrap(), AngularVector::zeros());
    assert!(filled.deflection(theta).unwrap().magnitude() > 0.0);
}

#[test]
fn test_insert_params_validates() {
    let mut arena = ModelArena::new();
    let good = LensParams::Sis {
        distance: Length::from_mpc(900.0),
        velocity_dispersion: Velocity::from_km_per_sec(180.0),
    };
    let bad = LensParams::Sis {
        distance: Length::from_mpc(-1.0),
        velocity_dispersion: Velocity::from_km_per_sec(180.0),
    };

    let id = arena.insert_params(&good).unwrap();
    assert!(arena.insert_params(&bad).is_err());
    assert_eq!(arena.len(), 1);
    assert_eq!(arena.build(id).unwrap().params(), good);
}

#[test]
fn test_handles_do_not_wrap() {
    assert_eq!(LensId::from_index(7).unwrap().raw(), 7);
    assert_eq!(LensId::from_index(u32::MAX as usize).unwrap().raw(), u32::MAX);

    #[cfg(target_pointer_width = "64")]
    assert!(matches!(
        LensId::from_index(u32::MAX as usize + 1),
        Err(LensError::InvalidParameter { name: "lens_id", .. })
    ));
}
