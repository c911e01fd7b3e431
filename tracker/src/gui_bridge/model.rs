use gpstrackcore::display::{DisplayModel, RenderCommand};
use gpstrackcore::prelude::DisplayAdapter;
use std::sync::{Arc, RwLock};

/// Display model shared between the runner (sole writer) and the bridge.
#[derive(Clone, Default)]
pub struct SharedDisplay {
    inner: Arc<RwLock<DisplayModel>>,
}

impl SharedDisplay {
    pub fn new(model: DisplayModel) -> Self {
        Self {
            inner: Arc::new(RwLock::new(model)),
        }
    }

    pub fn snapshot(&self) -> DisplayModel {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DisplayAdapter for SharedDisplay {
    fn apply(&mut self, command: &RenderCommand) {
        self.apply_all(std::slice::from_ref(command));
    }

    fn apply_all(&mut self, commands: &[RenderCommand]) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.apply_all(commands);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpstrackcore::geo::LatLon;

    #[test]
    fn clones_observe_the_same_model() {
        let mut writer = SharedDisplay::default();
        let reader = writer.clone();
        writer.apply(&RenderCommand::HideLoading);
        writer.apply(&RenderCommand::PanTo {
            position: LatLon::new(5.0, 6.0),
        });
        let snapshot = reader.snapshot();
        assert!(!snapshot.loading_visible);
        assert_eq!(snapshot.view_center, LatLon::new(5.0, 6.0));
    }
}
