use bevy::{asset::LoadState, prelude::*};

/// Result of a fire-and-forget load, reported exactly once
#[derive(Debug, Clone)]
pub enum LoadOutcome<A: Asset> {
    Ready(Handle<A>),
    Failed(String),
}

/// An asset requested at startup whose completion has not been consumed yet.
/// Once `settle` hands out an outcome the load is considered finished and never reported again.
#[derive(Debug, Resource)]
pub struct PendingLoad<A: Asset> {
    pub path: String,
    handle: Handle<A>,
    settled: bool,
}
impl<A: Asset> PendingLoad<A> {
    pub fn new(path: impl Into<String>, handle: Handle<A>) -> Self {
        Self { path: path.into(), handle, settled: false }
    }

    pub fn request(asset_server: &AssetServer, path: impl Into<String>) -> Self {
        let path = path.into();
        let handle = asset_server.load::<A>(path.clone());
        Self::new(path, handle)
    }

    pub fn classify(&self, state: Option<LoadState>) -> Option<LoadOutcome<A>> {
        match state {
            Some(LoadState::Loaded) => Some(LoadOutcome::Ready(self.handle.clone())),
            Some(LoadState::Failed(error)) => Some(LoadOutcome::Failed(error.to_string())),
            _ => None,
        }
    }

    /// Passes a finished outcome through the first time, swallows everything afterwards
    pub fn settle(&mut self, outcome: Option<LoadOutcome<A>>) -> Option<LoadOutcome<A>> {
        if self.settled {return None;}
        let outcome = outcome?;
        self.settled = true;
        Some(outcome)
    }

    pub fn poll(&mut self, asset_server: &AssetServer) -> Option<LoadOutcome<A>> {
        if self.settled {return None;}
        let outcome = self.classify(asset_server.get_load_state(self.handle.id()));
        self.settle(outcome)
    }
}
