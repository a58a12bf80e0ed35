//! End-to-end scenarios driven through `SimulationState`

use abbey::config::{AbbeyConfig, DoorConfig};
use abbey::glam::Vec3;
use abbey::{
    AvatarController, AvatarPose, CameraMode, Door, InputEvent, MoveIntent, QuestStage, RoomGraph,
    SimEvent, SimulationState,
};
use devices::{Key, MouseButtonType};
use std::f32::consts::{FRAC_PI_2, PI};

const DT: f32 = 1.0 / 60.0;

fn sim() -> SimulationState {
    SimulationState::new(AbbeyConfig::default()).unwrap()
}

fn run(sim: &mut SimulationState, ticks: usize) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(sim.tick(DT).events);
    }
    events
}

fn press(sim: &mut SimulationState, key: Key) {
    sim.handle_input(&InputEvent::KeyDown(key));
}

fn release(sim: &mut SimulationState, key: Key) {
    sim.handle_input(&InputEvent::KeyUp(key));
}

#[test]
fn test_idle_tick_leaves_avatar_alone() {
    let mut sim = sim();
    let before = *sim.avatar();
    sim.tick(DT);
    assert_eq!(sim.avatar().position, before.position);
    assert_eq!(sim.avatar().facing_yaw, before.facing_yaw);
}

#[test]
fn test_walk_to_door_and_open_it() {
    let mut sim = sim();
    sim.place_avatar(AvatarPose::new(Vec3::new(6.5, 0.0, 0.0), FRAC_PI_2));
    run(&mut sim, 200);

    press(&mut sim, Key::Z);
    run(&mut sim, 40);
    release(&mut sim, Key::Z);
    let at_door = sim.avatar().position;
    assert!((at_door.x - 9.5).abs() < 1e-4, "stopped at the closed door, got {at_door:?}");
    assert!(at_door.z.abs() < 0.1);

    press(&mut sim, Key::E);
    let events = sim.tick(DT).events;
    assert!(events.contains(&SimEvent::DoorToggled { door: 0, is_open: true }));
    assert!(sim.doors()[0].is_open());
    assert_eq!(sim.doors()[0].target_angle(), FRAC_PI_2);
    release(&mut sim, Key::E);

    // 0.95^n residual drops under 0.01 after 99 ticks
    run(&mut sim, 120);
    assert!((sim.doors()[0].current_angle() - FRAC_PI_2).abs() < 0.01);

    // The open doorway now lets the avatar through
    press(&mut sim, Key::Z);
    run(&mut sim, 30);
    assert!(sim.avatar().position.x > 10.0);
}

#[test]
fn test_first_approach_to_monk_shows_dialogue_once() {
    let mut sim = sim();
    sim.place_avatar(AvatarPose::new(Vec3::new(3.0, 0.0, -1.5), 0.0));
    sim.tick(DT);
    assert_eq!(sim.interaction().quest(0).unwrap().stage, QuestStage::InRangeUnengaged);

    press(&mut sim, Key::E);
    let events = run(&mut sim, 30);
    let dialogues: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            SimEvent::ShowDialogue { npc, speaker, paragraphs } => Some((npc, speaker, paragraphs.len())),
            _ => None,
        })
        .collect();
    assert_eq!(dialogues.len(), 1);
    assert_eq!(dialogues[0].0, "monk");
    assert!(dialogues[0].2 > 0);

    let quest = sim.interaction().quest(0).unwrap();
    assert!(quest.dialogue_shown);
    assert_eq!(quest.stage, QuestStage::InProgress);
    assert_eq!(sim.interaction().panel().status_label, "In Progress");

    release(&mut sim, Key::E);
    sim.handle_input(&InputEvent::DialogueClosed("monk".into()));
    let events = sim.tick(DT).events;
    assert!(events.contains(&SimEvent::QuestCompleted { npc: "monk".into() }));
    assert_eq!(sim.interaction().quest(0).unwrap().stage, QuestStage::Completed);
}

#[test]
fn test_closed_door_keeps_avatar_in_altar_room() {
    let mut sim = sim();
    sim.place_avatar(AvatarPose::new(Vec3::new(10.5, 0.0, 3.0), -FRAC_PI_2));
    run(&mut sim, 200);

    press(&mut sim, Key::Z);
    for _ in 0..60 {
        sim.tick(DT);
        assert!(sim.avatar().position.x >= 10.0, "leaked through the wall: {:?}", sim.avatar());
    }
    assert_eq!(sim.avatar().position.x, 10.0);
    assert!(!sim.doors()[0].is_open());
}

fn tap_interact(sim: &mut SimulationState) -> Vec<SimEvent> {
    press(sim, Key::E);
    let events = sim.tick(DT).events;
    release(sim, Key::E);
    events
}

#[test]
fn test_door_closing_on_threshold_returns_avatar_to_its_room() {
    // (x in the corridor, expected x after the close, expected room)
    for (x, settled_x, room) in [(9.8, 9.5, 0), (10.3, 10.3, 1)] {
        let mut sim = sim();
        sim.place_avatar(AvatarPose::new(Vec3::new(9.5, 0.0, 0.0), FRAC_PI_2));
        let events = tap_interact(&mut sim);
        assert!(events.contains(&SimEvent::DoorToggled { door: 0, is_open: true }));

        sim.place_avatar(AvatarPose::new(Vec3::new(x, 0.0, 0.0), FRAC_PI_2));
        sim.tick(DT);
        assert_eq!(sim.avatar().position.x, x, "open doorway holds the avatar at {x}");

        let events = tap_interact(&mut sim);
        assert!(events.contains(&SimEvent::DoorToggled { door: 0, is_open: false }));
        assert!(!sim.doors()[0].is_open());

        sim.tick(DT);
        let p = sim.avatar().position;
        assert_eq!(p.x, settled_x, "from x={x}");
        assert_eq!(sim.world().room_index_for(p), room);
        assert!(sim.world().is_valid_position(p, |_: usize| false));
    }
}

#[test]
fn test_camera_returns_to_follow_after_release_delay() {
    let mut sim = sim();
    sim.handle_input(&InputEvent::MouseDown(MouseButtonType::Right));
    sim.tick(DT);
    assert_eq!(sim.camera().mode, CameraMode::Manual);

    sim.handle_input(&InputEvent::MouseUp(MouseButtonType::Right));
    sim.tick(DT);
    run(&mut sim, 100);
    assert_eq!(sim.camera().mode, CameraMode::Manual);

    let events = run(&mut sim, 25);
    assert_eq!(sim.camera().mode, CameraMode::Follow);
    assert!(events.contains(&SimEvent::CameraModeChanged { mode: CameraMode::Follow }));
}

#[test]
fn test_new_grab_cancels_pending_release() {
    let mut sim = sim();
    sim.handle_input(&InputEvent::MouseDown(MouseButtonType::Right));
    sim.handle_input(&InputEvent::MouseUp(MouseButtonType::Right));
    sim.tick(DT);
    run(&mut sim, 60);

    sim.handle_input(&InputEvent::MouseDown(MouseButtonType::Right));
    run(&mut sim, 180);
    assert_eq!(sim.camera().mode, CameraMode::Manual);
    assert!(sim.camera().release.is_none());
}

#[test]
fn test_move_vector_is_unit_or_zero_for_every_key_set() {
    let cameras = [
        Vec3::NEG_Z,
        Vec3::new(0.3, -0.5, 0.8),
        Vec3::new(-1.0, -2.0, 0.0),
        Vec3::NEG_Y,
        Vec3::ZERO,
    ];
    for bits in 0u8..64 {
        let intent = MoveIntent {
            forward: bits & 1 != 0,
            backward: bits & 2 != 0,
            left: bits & 4 != 0,
            right: bits & 8 != 0,
            rotate_left: bits & 16 != 0,
            rotate_right: bits & 32 != 0,
        };
        for camera in cameras {
            let dir = AvatarController::move_direction(&intent, camera, Vec3::Z);
            assert!(dir.is_finite(), "NaN for {intent:?} / {camera:?}");
            let len = dir.length();
            assert!(len == 0.0 || (len - 1.0).abs() < 1e-5, "length {len} for {intent:?}");
        }
    }
}

#[test]
fn test_clamped_positions_stay_valid_near_doorway() {
    let config = AbbeyConfig::default();
    let world = RoomGraph::new(config.scene.rooms.clone(), config.scene.apertures.clone());
    let controller = AvatarController::new(config.motion.clone());
    let directions: Vec<Vec3> = (0..8)
        .map(|i| {
            let a = i as f32 * PI / 4.0;
            Vec3::new(a.sin(), -0.3, a.cos())
        })
        .collect();

    for open in [false, true] {
        let mut door = Door::new(&DoorConfig::default());
        if open {
            door.toggle();
        }
        let doors = [door];
        let is_open = |_: usize| open;

        for xi in 0..=16 {
            for zi in 0..=16 {
                let start = Vec3::new(8.5 + xi as f32 * 0.1875, 0.0, -1.5 + zi as f32 * 0.1875);
                if !world.is_valid_position(start, is_open) {
                    continue;
                }
                for bits in 1u8..16 {
                    let intent = MoveIntent {
                        forward: bits & 1 != 0,
                        backward: bits & 2 != 0,
                        left: bits & 4 != 0,
                        right: bits & 8 != 0,
                        ..Default::default()
                    };
                    for camera in &directions {
                        let pose = AvatarPose::new(start, 0.0);
                        // Large steps to cross the corridor in one move
                        for dt in [DT, 0.2] {
                            let next = controller.step(pose, &intent, *camera, &world, &doors, dt);
                            let p = next.position;
                            assert!((0.0..=4.0).contains(&p.y));
                            assert!(
                                world.is_valid_position(p, is_open),
                                "invalid {p:?} from {start:?} (open={open})"
                            );
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn test_long_session_stays_in_bounds() {
    let mut sim = sim();
    let keys = [Key::Z, Key::S, Key::Q, Key::D, Key::A];
    let mut held: Vec<Key> = Vec::new();

    for step in 0..6000usize {
        if step % 45 == 0 {
            for key in held.drain(..) {
                release(&mut sim, key);
            }
            let pattern = (step / 45) * 7 + 3;
            for (i, key) in keys.iter().enumerate() {
                if pattern & (1 << i) != 0 {
                    press(&mut sim, *key);
                    held.push(*key);
                }
            }
        }
        if step % 90 == 30 {
            sim.handle_input(&InputEvent::Wheel(if step % 180 == 30 { -1.0 } else { 1.0 }));
        }
        if step % 300 == 100 {
            sim.handle_input(&InputEvent::MouseDown(MouseButtonType::Right));
            sim.handle_input(&InputEvent::MouseMove(abbey::glam::Vec2::new(25.0, -8.0)));
        }
        if step % 300 == 160 {
            sim.handle_input(&InputEvent::MouseUp(MouseButtonType::Right));
        }
        if step % 20 == 0 {
            press(&mut sim, Key::E);
        } else if step % 20 == 1 {
            release(&mut sim, Key::E);
        }

        let open_before = sim.doors()[0].is_open();
        let out = sim.tick(DT);
        let snap = &out.snapshot;

        let p = snap.avatar.position;
        assert!(p.is_finite() && snap.avatar.facing_yaw.is_finite());
        assert!((0.0..=4.0).contains(&p.y));
        assert!(sim.world().is_valid_position(p, |_: usize| open_before), "step {step}: {p:?}");

        let camera = &snap.camera;
        assert!(camera.position.is_finite());
        assert!((2.0..=6.0).contains(&camera.distance));
        assert!((0.5..=3.5).contains(&camera.position.y));
    }
}

#[test]
fn test_zoom_distance_bounded_under_any_wheel_sequence() {
    let mut sim = sim();
    for round in 0..40 {
        let notches = (round * 13) % 37;
        let delta = if round % 3 == 0 { 120.0 } else { -3.0 };
        for _ in 0..notches {
            sim.handle_input(&InputEvent::Wheel(delta));
        }
        sim.tick(DT);
        let d = sim.camera().distance;
        assert!((2.0..=6.0).contains(&d), "distance {d}");
    }
}

#[test]
fn test_door_swing_is_monotonic_through_the_sim() {
    let mut sim = sim();
    sim.place_avatar(AvatarPose::new(Vec3::new(9.5, 0.0, 0.0), FRAC_PI_2));
    press(&mut sim, Key::E);
    let mut last = sim.tick(DT).snapshot.doors[0].yaw;
    release(&mut sim, Key::E);
    for _ in 0..200 {
        let yaw = sim.tick(DT).snapshot.doors[0].yaw;
        assert!(yaw >= last && yaw <= FRAC_PI_2);
        last = yaw;
    }

    press(&mut sim, Key::E);
    sim.tick(DT);
    release(&mut sim, Key::E);
    for _ in 0..200 {
        let yaw = sim.tick(DT).snapshot.doors[0].yaw;
        assert!(yaw <= last && yaw >= 0.0);
        last = yaw;
    }
    assert!(last < 0.01);
}

#[test]
fn test_standing_in_zone_writes_panel_once() {
    let mut sim = sim();
    sim.place_avatar(AvatarPose::new(Vec3::new(3.0, 0.0, -1.5), 0.0));
    let panels = run(&mut sim, 50)
        .into_iter()
        .filter(|e| matches!(e, SimEvent::QuestPanel(_)))
        .count();
    assert_eq!(panels, 1);
}

#[test]
fn test_single_room_configuration() {
    let config = AbbeyConfig::from_toml_str(
        r#"
        [scene]
        apertures = []

        [[scene.rooms]]
        name = "chapel"
        min_x = -4.0
        max_x = 4.0
        min_z = -4.0
        max_z = 4.0

        [[scene.npcs]]
        id = "prior"
        name = "Prior"
        position = [2.0, 0.0, 2.0]
        dialogue = ["Welcome."]

        [scene.npcs.prompt]
        title = "Talk to the prior"
        status = "in_range"
        description = "The prior waits by the font."

        [scene.npcs.engaged]
        title = "A quiet word"
        status = "in_progress"
        description = "The prior greets you."
        "#,
    )
    .unwrap();
    let mut sim = SimulationState::new(config).unwrap();
    assert!(sim.doors().is_empty());
    assert!(sim.snapshot().doors.is_empty());

    press(&mut sim, Key::Z);
    run(&mut sim, 300);
    let p = sim.avatar().position;
    assert!(p.x.abs() <= 4.0 && p.z.abs() <= 4.0);

    release(&mut sim, Key::Z);
    sim.place_avatar(AvatarPose::new(Vec3::new(2.0, 0.0, 1.0), 0.0));
    press(&mut sim, Key::E);
    let events = sim.tick(DT).events;
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::ShowDialogue { npc, .. } if npc == "prior")));
}
