// Host-side tests for the animation loop: bounds, warp ramp, connection cadence.

use glam::Vec3;
use warp_core::*;

fn assert_within(set: &ParticleSet, bounds: &Bounds, slack: Vec3) {
    let limit = bounds.half_extent + slack;
    for (i, p) in set.positions.iter().enumerate() {
        let d = (*p - bounds.center).abs();
        assert!(
            d.cmple(limit).all(),
            "particle {} at {:?} escaped {:?} (+{:?})",
            i,
            p,
            bounds,
            slack
        );
    }
}

fn still_config() -> NetworkConfig {
    let mut cfg = NetworkConfig::default();
    cfg.motion.drift_amplitude = 0.0;
    cfg
}

fn still_sim(cfg: NetworkConfig, field: Vec<Vec3>) -> Simulation {
    Simulation::from_parts(
        cfg,
        ParticleSet::from_positions(Population::Field, field),
        ParticleSet::from_positions(Population::Warp, vec![Vec3::new(0.0, 0.0, -200.0)]),
        1,
    )
    .unwrap()
}

#[test]
fn field_stays_in_200x150x80_box_for_1000_ticks() {
    let mut cfg = NetworkConfig::default();
    let the_box = Bounds::from_size(Vec3::new(0.0, 0.0, -30.0), Vec3::new(200.0, 150.0, 80.0));
    cfg.field.count = 120;
    cfg.field.spawn = the_box;
    cfg.field.bounce = the_box;
    let step = cfg.max_field_step();
    let mut sim = Simulation::new(cfg, 42).unwrap();

    for _ in 0..1000 {
        sim.tick();
        assert_within(sim.field(), &the_box, step);
    }
    assert_eq!(sim.field().len(), 120);
}

#[test]
fn default_bounce_walls_hold_over_long_runs() {
    let cfg = NetworkConfig::default();
    let bounds = cfg.field.bounce;
    let step = cfg.max_field_step();
    let mut sim = Simulation::new(cfg, 9).unwrap();
    for _ in 0..5000 {
        sim.tick();
    }
    assert_within(sim.field(), &bounds, step);
}

#[test]
fn particle_outside_wall_turns_back() {
    let mut cfg = still_config();
    cfg.field.bounce = Bounds::new(Vec3::ZERO, Vec3::splat(10.0));
    let mut field =
        ParticleSet::from_positions(Population::Field, vec![Vec3::new(9.99, 0.0, 0.0)]);
    field.velocities[0] = Vec3::new(0.5, 0.0, 0.0);
    let warp = ParticleSet::from_positions(Population::Warp, vec![Vec3::new(0.0, 0.0, -200.0)]);
    let mut sim = Simulation::from_parts(cfg, field, warp, 1).unwrap();

    sim.tick();
    assert_eq!(sim.field().positions[0].x, 10.0);
    assert!(sim.field().velocities[0].x < 0.0);
    sim.tick();
    assert!(sim.field().positions[0].x < 10.0);
}

#[test]
fn warp_intensity_is_monotonic_and_capped() {
    let mut sim = Simulation::new(NetworkConfig::default(), 5).unwrap();
    for _ in 0..10 {
        sim.tick();
    }
    assert_eq!(sim.warp_state(), WarpState::Inactive);

    sim.request_warp();
    let mut last = sim.warp_state().intensity();
    for _ in 0..200 {
        sim.tick();
        let now = sim.warp_state().intensity();
        assert!(now >= last, "intensity dropped {} -> {}", last, now);
        assert!(now <= 1.0);
        last = now;
    }
    assert_eq!(last, 1.0);
}

#[test]
fn intensity_saturates_after_34_frames() {
    let mut sim = Simulation::new(NetworkConfig::default(), 5).unwrap();
    sim.request_warp();
    for _ in 0..33 {
        sim.tick();
    }
    assert!(sim.warp_state().intensity() < 1.0);
    sim.tick();
    assert_eq!(sim.warp_state().intensity(), 1.0);
}

#[test]
fn warp_speed_ramps_to_cap_and_stays_there() {
    let cfg = NetworkConfig::default();
    let cap = cfg.warp.speed_max;
    let frames_to_cap = cfg.frames_to_speed_cap();
    let mut sim = Simulation::new(cfg, 5).unwrap();
    sim.request_warp();

    for _ in 0..34 {
        sim.tick();
    }
    let expected = 0.5 + 0.15 * 34.0;
    assert!((sim.warp_state().speed() - expected).abs() < 1e-3);

    for _ in 34..frames_to_cap {
        sim.tick();
        assert!(sim.warp_state().speed() <= cap);
    }
    assert_eq!(sim.warp_state().speed(), cap);
    for _ in 0..50 {
        sim.tick();
        assert_eq!(sim.warp_state().speed(), cap);
    }
}

#[test]
fn repeated_warp_requests_never_reset_progress() {
    let mut sim = Simulation::new(NetworkConfig::default(), 5).unwrap();
    sim.request_warp();
    let mut last = (0.0_f32, 0.0_f32);
    for _ in 0..60 {
        sim.request_warp();
        sim.tick();
        let s = sim.warp_state();
        assert!(s.intensity() >= last.0);
        assert!(s.speed() >= last.1);
        last = (s.intensity(), s.speed());
    }
}

#[test]
fn connections_rebuild_on_cadence_with_exact_pair_count() {
    // x = 0, 10, 30, 100: pairs under 25 are (0,1) and (1,2)
    let field = vec![
        Vec3::new(0.0, 0.0, -30.0),
        Vec3::new(10.0, 0.0, -30.0),
        Vec3::new(30.0, 0.0, -30.0),
        Vec3::new(100.0, 0.0, -30.0),
    ];
    let mut sim = still_sim(still_config(), field);
    for _ in 0..3 {
        sim.tick();
        assert!(sim.connections().is_empty());
    }
    sim.tick();
    assert_eq!(sim.frame_count(), 4);
    assert_eq!(sim.connections().len(), 2);
    assert_eq!(sim.scene().lines.len(), 4);
    assert_eq!(sim.scene().lines_revision, 1);
}

#[test]
fn rebuild_replaces_stale_segments() {
    let mut cfg = still_config();
    cfg.connections.cadence = 1;
    let mut field = ParticleSet::from_positions(
        Population::Field,
        vec![Vec3::new(0.0, 0.0, -30.0), Vec3::new(20.0, 0.0, -30.0)],
    );
    // second particle walks away at 2 units per tick
    field.velocities[1] = Vec3::new(2.0, 0.0, 0.0);
    let warp = ParticleSet::from_positions(Population::Warp, vec![Vec3::new(0.0, 0.0, -200.0)]);
    let mut sim = Simulation::from_parts(cfg, field, warp, 1).unwrap();

    sim.tick(); // distance 22
    assert_eq!(sim.connections().len(), 1);
    sim.tick(); // 24
    assert_eq!(sim.connections().len(), 1);
    sim.tick(); // 26
    assert!(sim.connections().is_empty());
    assert!(sim.scene().lines.is_empty());
}

#[test]
fn warp_mode_freezes_rotation_and_line_rebuilds() {
    let mut sim = Simulation::new(NetworkConfig::default(), 3).unwrap();
    for _ in 0..8 {
        sim.tick();
    }
    let rotation = sim.rotation();
    let revision = sim.scene().lines_revision;
    sim.request_warp();
    for _ in 0..40 {
        sim.tick();
        assert_eq!(sim.rotation(), rotation);
        assert_eq!(sim.scene().lines_revision, revision);
    }
    assert_eq!(sim.scene().line_opacity, 0.0);
}

#[test]
fn line_opacity_fades_with_intensity() {
    let mut sim = Simulation::new(NetworkConfig::default(), 3).unwrap();
    assert!((sim.scene().line_opacity - 0.2).abs() < 1e-6);
    sim.request_warp();
    let mut last = sim.scene().line_opacity;
    for _ in 0..40 {
        sim.tick();
        let o = sim.scene().line_opacity;
        assert!(o <= last);
        last = o;
    }
}

#[test]
fn warp_recycles_without_changing_population_sizes() {
    let cfg = NetworkConfig::default();
    let near = cfg.warp.near_z;
    let (n_field, n_warp) = (cfg.field.count, cfg.warp.count);
    let mut sim = Simulation::new(cfg, 21).unwrap();
    sim.request_warp();
    for _ in 0..400 {
        sim.tick();
        assert!(sim.field().positions.iter().all(|p| p.z <= near));
        assert!(sim.warp_particles().positions.iter().all(|p| p.z <= near));
    }
    assert_eq!(sim.field().len(), n_field);
    assert_eq!(sim.warp_particles().len(), n_warp);
    assert_eq!(sim.scene().field.len(), n_field);
    assert_eq!(sim.scene().warp.len(), n_warp);
}

#[test]
fn pointer_tilts_idle_rotation() {
    let mut a = Simulation::new(NetworkConfig::default(), 1).unwrap();
    let mut b = Simulation::new(NetworkConfig::default(), 1).unwrap();
    b.set_pointer(glam::Vec2::new(1.0, 1.0));
    a.tick();
    b.tick();
    let d = b.rotation() - a.rotation();
    assert!((d.x - 0.05).abs() < 1e-6);
    assert!((d.y - 0.05).abs() < 1e-6);
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = NetworkConfig::default();
    cfg.field.count = 0;
    assert!(matches!(
        Simulation::new(cfg, 1),
        Err(ConfigError::EmptyPopulation("field"))
    ));
}
