use snooker_engine::{
    FixedTimestep, InputEvent, InputQueue, InstanceBuffer, PhysicsAdapter, Snapshot, SnookerGame,
};

/// Wires a [`SnookerGame`] to a frame loop.
///
/// The browser build keeps one runner in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<P: PhysicsAdapter> {
    game: SnookerGame<P>,
    input: InputQueue,
    timestep: FixedTimestep,
    instances: InstanceBuffer,
    snapshot: Snapshot,
}

impl<P: PhysicsAdapter> GameRunner<P> {
    pub fn new(game: SnookerGame<P>) -> Self {
        let timestep = FixedTimestep::new(game.config().fixed_dt);
        let snapshot = game.snapshot();
        let mut instances = InstanceBuffer::new();
        instances.fill(&snapshot);
        Self {
            game,
            input: InputQueue::new(),
            timestep,
            instances,
            snapshot,
        }
    }

    /// Queue an input event for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: apply queued input on the first fixed step, advance,
    /// then refresh the snapshot and the packed instances.
    pub fn tick(&mut self, dt: f32) {
        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            if step == 0 {
                for event in self.input.drain() {
                    self.game.handle_input(event);
                }
            }
            self.game.tick();
        }
        if steps == 0 {
            return;
        }

        self.snapshot = self.game.snapshot();
        self.instances.fill(&self.snapshot);
    }

    pub fn game(&self) -> &SnookerGame<P> {
        &self.game
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn snapshot_json(&self) -> String {
        match self.snapshot.to_json() {
            Ok(json) => json,
            Err(err) => {
                log::error!("snapshot serialization failed: {}", err);
                String::from("{}")
            }
        }
    }

    pub fn instance_floats(&self) -> &[f32] {
        self.instances.as_floats()
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.instance_count()
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    pub fn alpha(&self) -> f32 {
        self.timestep.alpha()
    }
}
