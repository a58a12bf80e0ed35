//! The bundled tour script plays through end to end

use abbey::{AbbeyConfig, SimEvent, SimulationState};
use game::{Presenter, ReplayRuntime, Script};

#[derive(Default)]
struct Collect {
    events: Vec<SimEvent>,
    last_tick: u64,
}

impl Presenter for Collect {
    fn resized(&mut self, _width: u32, _height: u32) -> anyhow::Result<()> {
        Ok(())
    }

    fn event(&mut self, _tick: u64, event: &SimEvent) -> anyhow::Result<()> {
        self.events.push(event.clone());
        Ok(())
    }

    fn frame(&mut self, snapshot: &abbey::FrameSnapshot) -> anyhow::Result<()> {
        self.last_tick = snapshot.tick;
        Ok(())
    }
}

#[test]
fn test_tour_script() {
    let script = Script::from_toml_str(include_str!("../scripts/walk.toml")).unwrap();
    let sim = SimulationState::new(AbbeyConfig::default()).unwrap();
    let mut runtime = ReplayRuntime::new(sim, 60.0, None).unwrap();
    let mut out = Collect::default();
    let stats = runtime.run(&script, &mut out).unwrap();

    assert_eq!(stats.ticks, script.total_ticks());
    assert_eq!(out.last_tick, stats.ticks);

    let dialogues: Vec<&str> = out
        .events
        .iter()
        .filter_map(|e| match e {
            SimEvent::ShowDialogue { npc, .. } => Some(npc.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(dialogues, vec!["monk", "altar_keeper"]);

    assert!(out
        .events
        .contains(&SimEvent::DoorToggled { door: 0, is_open: true }));
    let completed = out
        .events
        .iter()
        .filter(|e| matches!(e, SimEvent::QuestCompleted { .. }))
        .count();
    assert_eq!(completed, 2);

    let sim = runtime.sim();
    assert!(sim.doors()[0].is_open());
    assert!(sim.avatar().position.x > 10.0);
}
