use trajectory::dynamics::diagnostics::{Invariants, total_momentum};
use trajectory::dynamics::{
    Body, DynamicsError, Gravity, StepBuffer, StepOptions, StepOrdering, System, advance_many,
    advance_system,
};
use trajectory::orbits::Orbit;
use trajectory::time::days_to_seconds;
use trajectory::vector::{self, VectorError};

/// Light body on a near-circular orbit around a heavy one, with zero total momentum.
fn two_body_system() -> System {
    let heavy = Body::new("heavy", 1.0e6, [0.0, 0.0, 0.0], [0.0, -1.0e-4, 0.0]);
    let light = Body::new("light", 1.0, [100.0, 0.0, 0.0], [0.0, 100.0, 0.0]);
    System::new(vec![heavy, light])
        .unwrap()
        .with_gravity(Gravity::new(1.0))
}

fn three_body_system(ordering: StepOrdering) -> System {
    System::new(vec![
        Body::new("a", 10.0, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
        Body::new("b", 1.0, [5.0, 0.0, 0.0], [0.0, 1.4, 0.0]),
        Body::new("c", 1.0, [-7.0, 1.0, 0.5], [0.0, -1.1, 0.2]),
    ])
    .unwrap()
    .with_gravity(Gravity::new(1.0))
    .with_options(StepOptions {
        ordering,
        ..StepOptions::default()
    })
}

#[test]
fn two_body_orbit_conserves_energy_and_angular_momentum() {
    let mut system = two_body_system();
    let initial = Invariants::measure(system.bodies(), system.gravity()).unwrap();
    assert_eq!(total_momentum(system.bodies()), [0.0, 0.0, 0.0]);

    let mut buffer = StepBuffer::for_system(&system);
    advance_many(&mut system, 0.01, 10_000, &mut buffer).unwrap();

    let last = Invariants::measure(system.bodies(), system.gravity()).unwrap();
    let drift = last.drift_from(&initial);
    assert!(drift.energy < 1e-3, "energy drift {}", drift.energy);
    assert!(
        drift.angular_momentum < 1e-3,
        "angular momentum drift {}",
        drift.angular_momentum
    );
    assert!((system.time() - 100.0).abs() < 1e-9);

    // still bound and roughly at the starting radius
    let r = vector::distance(&system.bodies()[0].pos, &system.bodies()[1].pos);
    assert!((r - 100.0).abs() < 1.0, "separation {r}");
}

#[test]
fn orderings_differ_once_several_bodies_move() {
    let mut gauss_seidel = three_body_system(StepOrdering::GaussSeidel);
    let mut jacobi = three_body_system(StepOrdering::Jacobi);
    let mut buffer = StepBuffer::new();
    advance_system(&mut gauss_seidel, 0.1, &mut buffer).unwrap();
    advance_system(&mut jacobi, 0.1, &mut buffer).unwrap();

    // the first body sees the same frozen collection either way
    assert_eq!(gauss_seidel.bodies()[0], jacobi.bodies()[0]);
    assert_ne!(gauss_seidel.bodies()[1].pos, jacobi.bodies()[1].pos);
    assert_ne!(gauss_seidel.bodies()[2].pos, jacobi.bodies()[2].pos);
}

#[test]
fn orderings_agree_for_a_single_body() {
    let lone = || {
        System::new(vec![Body::new("only", 2.0, [1.0, 1.0, 1.0], [0.3, -0.2, 0.1])]).unwrap()
    };
    let mut gauss_seidel = lone();
    let mut jacobi = lone().with_options(StepOptions {
        ordering: StepOrdering::Jacobi,
        ..StepOptions::default()
    });
    let mut buffer = StepBuffer::new();
    advance_many(&mut gauss_seidel, 0.5, 7, &mut buffer).unwrap();
    advance_many(&mut jacobi, 0.5, 7, &mut buffer).unwrap();
    assert_eq!(gauss_seidel.bodies(), jacobi.bodies());
}

#[test]
fn coincident_bodies_fail_the_step() {
    let mut system = System::new(vec![
        Body::new("a", 1.0, [1.0, 2.0, 3.0], [0.0; 3]),
        Body::new("b", 1.0, [1.0, 2.0, 3.0], [0.0; 3]),
    ])
    .unwrap();
    let mut buffer = StepBuffer::new();
    assert_eq!(
        system.step(1.0, &mut buffer),
        Err(DynamicsError::Vector(VectorError::DegenerateGeometry(
            "coincident bodies"
        )))
    );
    assert_eq!(system.time(), 0.0);
}

#[test]
fn validation_rejects_bad_systems() {
    assert_eq!(System::new(Vec::new()), Err(DynamicsError::EmptySystem));

    let negative = vec![Body::new("neg", -1.0, [0.0; 3], [0.0; 3])];
    assert!(matches!(
        System::new(negative),
        Err(DynamicsError::InvalidMass { .. })
    ));

    let orbit = Orbit {
        sma: 1.0e9,
        ecc: 0.1,
        inc: 0.2,
        parent: Some(0),
        ..Orbit::default()
    };
    let hyperbolic = vec![
        Body::new("star", 1.0e30, [0.0; 3], [0.0; 3]),
        Body::orbiting("comet", 1.0e12, Orbit { ecc: 1.0, ..orbit }),
    ];
    assert!(matches!(
        System::new(hyperbolic),
        Err(DynamicsError::InvalidEccentricity { .. })
    ));

    let misordered = vec![
        Body::orbiting("moon", 1.0e20, Orbit { parent: Some(1), ..orbit }),
        Body::new("planet", 1.0e24, [0.0; 3], [0.0; 3]),
    ];
    assert!(matches!(
        System::new(misordered),
        Err(DynamicsError::ParentOrder { .. })
    ));

    let own_parent = vec![
        Body::new("star", 1.0e30, [0.0; 3], [0.0; 3]),
        Body::orbiting("loop", 1.0e20, Orbit { parent: Some(1), ..orbit }),
    ];
    assert!(matches!(
        System::new(own_parent),
        Err(DynamicsError::ParentOrder { .. })
    ));
}

#[test]
fn hierarchical_system_keeps_the_moon_near_its_planet() {
    let earth_orbit = Orbit {
        sma: 1.496e11,
        ecc: 0.0167,
        inc: 0.001,
        lan: 0.2,
        ape: 1.9,
        parent: Some(0),
        ..Orbit::default()
    };
    let moon_orbit = Orbit {
        sma: 3.844e8,
        ecc: 0.0549,
        inc: 0.09,
        lan: 2.1,
        ape: 5.5,
        mna: 1.0,
        parent: Some(1),
        ..Orbit::default()
    };
    let mut system = System::new(vec![
        Body::new("Sun", 1.988e30, [0.0; 3], [0.0; 3]),
        Body::orbiting("Earth", 5.97e24, earth_orbit),
        Body::orbiting("Moon", 7.342e22, moon_orbit),
    ])
    .unwrap();
    assert_eq!(system.seed_from_elements().unwrap(), 2);

    let mut buffer = StepBuffer::for_system(&system);
    // ten days in ten-minute steps
    let steps = (days_to_seconds(10.0) / 600.0) as usize;
    advance_many(&mut system, 600.0, steps, &mut buffer).unwrap();
    assert_eq!(steps, 1_440);

    let bodies = system.bodies();
    let separation = vector::distance(&bodies[1].pos, &bodies[2].pos);
    assert!(
        separation > 3.4e8 && separation < 4.2e8,
        "earth-moon separation {separation}"
    );
    let moon = system.derive_orbital_elements(2).unwrap();
    assert!((moon.sma - 3.844e8).abs() / 3.844e8 < 0.05, "{moon:?}");
}

#[test]
fn refreshed_orbits_reseed_to_the_same_state() {
    let sun = Body::new("Sun", 1.988e30, [1.0e6, -2.0e6, 0.0], [12.0, -3.0, 0.5]);
    let orbit = Orbit {
        sma: 2.279e11,
        ecc: 0.093,
        inc: 0.032,
        lan: 0.86,
        ape: 5.0,
        mna: 0.3,
        parent: Some(0),
        ..Orbit::default()
    };
    let mut system = System::new(vec![sun, Body::orbiting("Mars", 6.42e23, orbit)]).unwrap();
    system.seed_from_elements().unwrap();
    let mut buffer = StepBuffer::for_system(&system);
    advance_many(&mut system, 3_600.0, 240, &mut buffer).unwrap();

    let before = system.bodies().to_vec();
    system.refresh_orbits().unwrap();
    assert_eq!(system.bodies()[1].orbit.epoch, system.time());
    assert_eq!(system.bodies()[0].orbit, Orbit::default());
    system.seed_from_elements().unwrap();

    for (old, new) in before.iter().zip(system.bodies()) {
        assert!(vector::distance(&old.pos, &new.pos) < 1.0e3, "{}", new.name);
        assert!(vector::distance(&old.vel, &new.vel) < 1.0e-3, "{}", new.name);
    }
}
