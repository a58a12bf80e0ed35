//! Output sinks standing in for the renderer, quest panel and dialogue window

use abbey::{FrameSnapshot, SimEvent};
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// Receives everything the simulation produces during a replay
pub trait Presenter {
    /// Window size changed; forwarded untouched from the input stream
    fn resized(&mut self, width: u32, height: u32) -> Result<()>;

    /// One externally visible change
    fn event(&mut self, tick: u64, event: &SimEvent) -> Result<()>;

    /// Called after every tick
    fn frame(&mut self, snapshot: &FrameSnapshot) -> Result<()>;

    /// Called once with the last snapshot
    fn finish(&mut self, _snapshot: &FrameSnapshot) -> Result<()> {
        Ok(())
    }
}

/// Writes events to the tracing log
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn resized(&mut self, width: u32, height: u32) -> Result<()> {
        tracing::info!("Viewport resized to {}x{}", width, height);
        Ok(())
    }

    fn event(&mut self, tick: u64, event: &SimEvent) -> Result<()> {
        match event {
            SimEvent::QuestPanel(panel) => {
                tracing::info!(
                    "[{}] Quest panel: {} | {} | {}",
                    tick,
                    panel.title,
                    panel.status_label,
                    panel.description
                );
            }
            SimEvent::ShowDialogue {
                speaker,
                paragraphs,
                ..
            } => {
                tracing::info!("[{}] Dialogue with {}", tick, speaker);
                for paragraph in paragraphs {
                    tracing::info!("    {}", paragraph);
                }
            }
            SimEvent::DoorToggled { door, is_open } => {
                tracing::info!("[{}] Door {} is now {}", tick, door, if *is_open { "open" } else { "closed" });
            }
            SimEvent::CameraModeChanged { mode } => {
                tracing::info!("[{}] Camera mode {:?}", tick, mode);
            }
            SimEvent::QuestCompleted { npc } => {
                tracing::info!("[{}] Quest completed with {}", tick, npc);
            }
        }
        Ok(())
    }

    fn frame(&mut self, snapshot: &FrameSnapshot) -> Result<()> {
        let avatar = &snapshot.avatar;
        tracing::trace!(
            "Frame {}: avatar ({:.2}, {:.2}, {:.2}) yaw {:.2}, camera {:?}",
            snapshot.tick,
            avatar.position.x,
            avatar.position.y,
            avatar.position.z,
            avatar.facing_yaw,
            snapshot.camera.position
        );
        Ok(())
    }

    fn finish(&mut self, snapshot: &FrameSnapshot) -> Result<()> {
        tracing::info!(
            "Replay finished after {} ticks ({:.2}s); avatar at {:?}",
            snapshot.tick,
            snapshot.time,
            snapshot.avatar.position
        );
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Line<'a> {
    Resize { width: u32, height: u32 },
    Event { tick: u64, event: &'a SimEvent },
    Frame { snapshot: &'a FrameSnapshot },
}

/// Writes one JSON object per line
pub struct JsonPresenter<W: Write> {
    out: W,
    frames: bool,
}

impl<W: Write> JsonPresenter<W> {
    /// `frames` also emits a line per tick; otherwise only the final frame
    pub fn new(out: W, frames: bool) -> Self {
        Self { out, frames }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, line: &Line<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, line)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn resized(&mut self, width: u32, height: u32) -> Result<()> {
        self.write(&Line::Resize { width, height })
    }

    fn event(&mut self, tick: u64, event: &SimEvent) -> Result<()> {
        self.write(&Line::Event { tick, event })
    }

    fn frame(&mut self, snapshot: &FrameSnapshot) -> Result<()> {
        if self.frames {
            self.write(&Line::Frame { snapshot })?;
        }
        Ok(())
    }

    fn finish(&mut self, snapshot: &FrameSnapshot) -> Result<()> {
        if !self.frames {
            self.write(&Line::Frame { snapshot })?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abbey::{AbbeyConfig, CameraMode, SimulationState};

    #[test]
    fn test_json_lines_are_tagged() {
        let mut sim = SimulationState::new(AbbeyConfig::default()).unwrap();
        let out = sim.tick(1.0 / 60.0);

        let mut presenter = JsonPresenter::new(Vec::new(), false);
        presenter.resized(640, 480).unwrap();
        presenter
            .event(1, &SimEvent::CameraModeChanged { mode: CameraMode::Manual })
            .unwrap();
        presenter.frame(&out.snapshot).unwrap();
        presenter.finish(&out.snapshot).unwrap();

        let text = String::from_utf8(presenter.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["kind"], "resize");
        assert_eq!(lines[0]["width"], 640);
        assert_eq!(lines[1]["event"]["event"], "camera_mode_changed");
        assert_eq!(lines[1]["event"]["mode"], "manual");
        assert_eq!(lines[2]["kind"], "frame");
        assert_eq!(lines[2]["snapshot"]["tick"], 1);
    }
}
