//! Integration test: emitter registry end to end.
//!
//! Registers emitters on the boundaries of a small grid, runs several
//! emission steps and checks registration errors, charge conservation
//! and reproducibility from a seed.

use cathode_core::{
    Axis, Grid, InterpolatorArray, LocalGrid, Particle, RegistryError, Side, SpeciesId,
};
use cathode_emit::{ChildLangmuir, ColdCube, EmitterRegistry, Ivory, RngStreams};
use cathode_test_utils::{MockAccumulator, MockChargeField, MockSpecies};

const ELECTRON: SpeciesId = SpeciesId(0);
const ION: SpeciesId = SpeciesId(1);

fn grid() -> LocalGrid {
    LocalGrid::new([4, 4, 4], [0.5, 0.5, 0.5], 0.05)
        .unwrap()
        .with_constants(1.0, 1.0)
        .unwrap()
}

fn registry(grid: &LocalGrid) -> EmitterRegistry {
    let mut reg = EmitterRegistry::new();
    reg.register(
        "cathode",
        ELECTRON,
        ChildLangmuir::builder()
            .n_emit_per_face(4)
            .ut_perp(0.01)
            .ut_para(0.01)
            .build()
            .unwrap(),
        64,
    )
    .unwrap()
    .extend_components(grid.boundary_faces(Axis::X, Side::High))
    .unwrap();
    reg.register(
        "anode",
        ION,
        ColdCube::builder()
            .n_emit_per_face(2)
            .thresh_e_norm(0.5)
            .ut_perp(0.001)
            .ut_para(0.001)
            .build()
            .unwrap(),
        64,
    )
    .unwrap()
    .extend_components(grid.boundary_faces(Axis::X, Side::Low))
    .unwrap();
    reg.register(
        "wall",
        ELECTRON,
        Ivory::builder()
            .n_emit_per_face(3)
            .thresh_e_norm(0.5)
            .build()
            .unwrap(),
        64,
    )
    .unwrap()
    .extend_components(grid.boundary_faces(Axis::Z, Side::Low))
    .unwrap();
    reg
}

struct Step {
    species: Vec<MockSpecies>,
    field: MockChargeField,
    acc: MockAccumulator,
}

fn run(seed: u64, steps: usize) -> Step {
    let grid = grid();
    let interp = InterpolatorArray::uniform(grid.cell_count(), [1.0, 0.0, 0.0], [0.0; 3]);
    let reg = registry(&grid);
    reg.validate(&grid).unwrap();
    let mut streams = RngStreams::new(seed, 1);
    let mut out = Step {
        species: vec![
            MockSpecies::new("electron", -1.0, 10_000),
            MockSpecies::new("ion", 1.0, 10_000),
        ],
        field: MockChargeField::new(),
        acc: MockAccumulator::new(),
    };
    for _ in 0..steps {
        reg.emit_all(
            &mut out.species,
            &interp,
            &mut out.field,
            &mut out.acc,
            &grid,
            streams.stream_mut(0).unwrap(),
        )
        .unwrap();
    }
    out
}

#[test]
fn duplicate_anode_keeps_the_first() {
    let grid = grid();
    let mut reg = registry(&grid);
    let err = reg
        .register(
            "anode",
            ELECTRON,
            ChildLangmuir::builder().n_emit_per_face(1).build().unwrap(),
            8,
        )
        .unwrap_err();
    assert_eq!(err, RegistryError::DuplicateName { name: "anode".into() });
    assert_eq!(reg.iter().filter(|e| e.name() == "anode").count(), 1);
    assert_eq!(reg.find("anode").unwrap().species(), ION);
    assert_eq!(reg.len(), 3);
}

#[test]
fn capacity_is_fixed_at_registration() {
    let grid = grid();
    let mut reg = EmitterRegistry::new();
    let e = reg
        .register(
            "small",
            ION,
            ColdCube::builder()
                .n_emit_per_face(1)
                .thresh_e_norm(0.0)
                .build()
                .unwrap(),
            3,
        )
        .unwrap();
    let err = e
        .extend_components(grid.boundary_faces(Axis::Y, Side::High))
        .unwrap_err();
    assert!(matches!(err, RegistryError::CapacityExceeded { max_component: 3, .. }));
    assert_eq!(reg.find("small").unwrap().n_component(), 3);
}

#[test]
fn injected_charge_is_conserved() {
    let out = run(17, 5);
    let injected: f64 = out.species.iter().map(MockSpecies::total_charge).sum();
    let particles: usize = out.species.iter().map(|s| s.particles().len()).sum();

    // E_x = 1 pulls electrons off the +x face: ChildLangmuir fires on all
    // 16 faces with charge eps0 * 1 * 0.25 each. |E| = 1 > 0.5 fires the
    // ColdCube ions (16 faces * 2) and the Ivory electrons (16 faces * 3).
    assert_eq!(particles, 5 * (16 * 4 + 16 * 2 + 16 * 3));
    let expected = 5.0 * (16.0 * -0.25 + 16.0 * 2.0 + 16.0 * 3.0 * -1.0);
    assert!((injected - expected).abs() < 1e-9);
    assert!((out.acc.total_charge() - injected).abs() < 1e-9);
    assert!((out.field.total_rhob() + injected).abs() < 1e-9);
}

#[test]
fn same_seed_same_particles() {
    let a = run(99, 3);
    let b = run(99, 3);
    let c = run(100, 3);
    let key = |s: &Step| -> Vec<Particle> {
        s.species.iter().flat_map(|sp| sp.particles().to_vec()).collect()
    };
    assert_eq!(key(&a), key(&b));
    assert_ne!(key(&a), key(&c));
}

#[test]
fn particles_stay_on_their_component() {
    let out = run(5, 1);
    for p in out.species.iter().flat_map(|s| s.particles()) {
        for o in [p.dx, p.dy, p.dz] {
            assert!((-1.0..=1.0).contains(&o), "offset {o} outside cell");
        }
    }
}
