//! Background asset loading
//!
//! Every request runs on its own thread and reports back over one mpsc
//! channel that the UI drains once per frame. Nothing is cancelled or
//! de-duplicated; completions are handed over in arrival order.

use crate::error::Result;
use crate::gallery::{
    discover_scenes, AssetSource, LoadProgress, PreviewImage, SceneDescriptor, SceneSummary,
};
use crate::scene::{load_glb, SceneModel};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use uuid::Uuid;

/// Descriptor and decoded model of one scene
#[derive(Debug)]
pub struct LoadedScene {
    pub descriptor: SceneDescriptor,
    pub model: SceneModel,
}

#[derive(Debug)]
pub enum LoadMessage {
    Discovered {
        request: Uuid,
        scenes: Vec<SceneSummary>,
    },
    Preview {
        /// Discovery request the preview belongs to
        request: Uuid,
        scene_id: String,
        result: Result<PreviewImage>,
    },
    /// Model bytes read so far for an in-flight scene load
    Progress {
        request: Uuid,
        scene_id: String,
        progress: LoadProgress,
    },
    Scene {
        request: Uuid,
        scene_id: String,
        result: Result<LoadedScene>,
    },
}

/// Reads the descriptor, then the model. Either failure fails the load.
pub fn load_scene(source: &dyn AssetSource, scene_id: &str) -> Result<LoadedScene> {
    load_scene_with_progress(source, scene_id, &mut |_| {})
}

/// [`load_scene`], reporting model bytes as they are read
pub fn load_scene_with_progress(
    source: &dyn AssetSource,
    scene_id: &str,
    progress: &mut dyn FnMut(LoadProgress),
) -> Result<LoadedScene> {
    let descriptor = source.fetch_descriptor(scene_id)?;
    log::debug!(
        "Descriptor for scene {} lists {} objects",
        scene_id,
        descriptor.objects().len()
    );
    let bytes = source.fetch_model_with_progress(scene_id, progress)?;
    let model = load_glb(scene_id, &bytes)?;
    Ok(LoadedScene { descriptor, model })
}

pub struct BackgroundLoader {
    source: Arc<dyn AssetSource>,
    sender: Sender<LoadMessage>,
    receiver: Receiver<LoadMessage>,
    scenes_in_flight: usize,
}

impl BackgroundLoader {
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        let (sender, receiver) = channel();
        Self {
            source,
            sender,
            receiver,
            scenes_in_flight: 0,
        }
    }

    pub fn source(&self) -> &Arc<dyn AssetSource> {
        &self.source
    }

    /// Later requests use `source`; requests already running keep theirs
    pub fn set_source(&mut self, source: Arc<dyn AssetSource>) {
        self.source = source;
    }

    /// Scene loads started but not yet reported
    pub fn scenes_in_flight(&self) -> usize {
        self.scenes_in_flight
    }

    /// Lists the available scenes, then decodes their previews one by one
    pub fn discover(&self) -> Uuid {
        let request = Uuid::new_v4();
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        log::info!("Discovering scenes ({})", request);

        thread::spawn(move || {
            let scenes = discover_scenes(source.as_ref());
            let ids: Vec<String> = scenes.iter().map(|scene| scene.id.clone()).collect();
            if sender.send(LoadMessage::Discovered { request, scenes }).is_err() {
                return;
            }
            for scene_id in ids {
                let result = source.fetch_preview(&scene_id);
                if sender
                    .send(LoadMessage::Preview {
                        request,
                        scene_id,
                        result,
                    })
                    .is_err()
                {
                    return;
                }
            }
        });
        request
    }

    pub fn load_scene(&mut self, scene_id: &str) -> Uuid {
        let request = Uuid::new_v4();
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        let scene_id = scene_id.to_string();
        log::info!("Loading scene {} ({})", scene_id, request);
        self.scenes_in_flight += 1;

        thread::spawn(move || {
            let result = load_scene_with_progress(source.as_ref(), &scene_id, &mut |progress| {
                let _ = sender.send(LoadMessage::Progress {
                    request,
                    scene_id: scene_id.clone(),
                    progress,
                });
            });
            let _ = sender.send(LoadMessage::Scene {
                request,
                scene_id,
                result,
            });
        });
        request
    }

    /// Messages that arrived since the last call
    pub fn poll(&mut self) -> Vec<LoadMessage> {
        let messages: Vec<LoadMessage> = self.receiver.try_iter().collect();
        let finished = messages
            .iter()
            .filter(|message| matches!(message, LoadMessage::Scene { .. }))
            .count();
        self.scenes_in_flight = self.scenes_in_flight.saturating_sub(finished);
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::{DirectorySource, SceneCatalog};
    use crate::error::GalleryError;
    use std::time::{Duration, Instant};

    fn wait_for(loader: &mut BackgroundLoader, count: usize) -> Vec<LoadMessage> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut messages = Vec::new();
        while messages.len() < count && Instant::now() < deadline {
            messages.extend(loader.poll());
            thread::sleep(Duration::from_millis(5));
        }
        messages
    }

    #[test]
    fn test_missing_scene_reports_error() {
        let source = Arc::new(DirectorySource::new("/nonexistent/gallery", vec!["001".into()]));
        let mut loader = BackgroundLoader::new(source);
        let request = loader.load_scene("001");
        assert_eq!(loader.scenes_in_flight(), 1);

        let messages = wait_for(&mut loader, 1);
        match messages.as_slice() {
            [LoadMessage::Scene {
                request: got,
                scene_id,
                result: Err(GalleryError::DescriptorRead { .. }),
            }] => {
                assert_eq!(*got, request);
                assert_eq!(scene_id, "001");
            }
            other => panic!("unexpected messages: {:?}", other),
        }
        assert_eq!(loader.scenes_in_flight(), 0);
    }

    #[test]
    fn test_scene_load_reports_progress_before_result() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("001.json"),
            r#"{ "input_task_description": { "Task": "Set up the desk" } }"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("001.glb"), b"not a model").unwrap();
        let mut loader = BackgroundLoader::new(Arc::new(DirectorySource::new(dir.path(), vec![])));
        let request = loader.load_scene("001");

        let messages = wait_for(&mut loader, 2);
        match messages.as_slice() {
            [LoadMessage::Progress {
                request: got,
                progress,
                ..
            }, LoadMessage::Scene {
                result: Err(GalleryError::ModelDecode { .. }),
                ..
            }] => {
                assert_eq!(*got, request);
                assert_eq!(progress.loaded, 11);
                assert_eq!(progress.label(), "100.0% loaded");
            }
            other => panic!("unexpected messages: {:?}", other),
        }
        assert_eq!(loader.scenes_in_flight(), 0);
    }

    #[test]
    fn test_discovery_of_empty_root() {
        let source = Arc::new(DirectorySource::new("/nonexistent/gallery", vec!["001".into()]));
        assert!(source.list_scene_ids().is_empty());
        let mut loader = BackgroundLoader::new(source);
        let request = loader.discover();

        let messages = wait_for(&mut loader, 1);
        assert!(matches!(
            messages.as_slice(),
            [LoadMessage::Discovered { request: got, scenes }] if *got == request && scenes.is_empty()
        ));
    }
}
