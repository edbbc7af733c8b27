//! Asset retrieval by scene ID
//!
//! Every scene lives under one asset root as `<id>.json` (descriptor),
//! `<id>.glb` (model) and `<id>.png` (preview). Discovery goes through
//! [`SceneCatalog`] so the UI never builds paths itself.

use super::carousel::SceneSummary;
use super::descriptor::SceneDescriptor;
use crate::constants;
use crate::error::{GalleryError, Result};
use log::{debug, info, warn};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// One listed scene. Catalogs that had to parse the descriptor to list the
/// scene hand it over so discovery does not read it again.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: String,
    pub descriptor: Option<SceneDescriptor>,
}

/// Lists the scenes that can be loaded
pub trait SceneCatalog: Send + Sync {
    fn list_scenes(&self) -> Vec<CatalogEntry>;

    fn list_scene_ids(&self) -> Vec<String> {
        self.list_scenes().into_iter().map(|entry| entry.id).collect()
    }
}

/// Retrieves scene assets by ID
pub trait AssetSource: SceneCatalog {
    fn fetch_descriptor(&self, scene_id: &str) -> Result<SceneDescriptor>;
    fn fetch_model(&self, scene_id: &str) -> Result<Vec<u8>>;
    fn fetch_preview(&self, scene_id: &str) -> Result<PreviewImage>;

    /// Like [`fetch_model`](Self::fetch_model), reporting bytes read as they arrive
    fn fetch_model_with_progress(
        &self,
        scene_id: &str,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<Vec<u8>> {
        let bytes = self.fetch_model(scene_id)?;
        let len = bytes.len() as u64;
        progress(LoadProgress {
            loaded: len,
            total: Some(len),
        });
        Ok(bytes)
    }
}

/// Bytes of a model read so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    /// `None` when the size is not known up front
    pub total: Option<u64>,
}

impl LoadProgress {
    /// `42.5% loaded` with a known size, else `3.2 MB loaded`
    pub fn label(&self) -> String {
        match self.total.filter(|total| *total > 0) {
            Some(total) => format!("{:.1}% loaded", self.loaded as f64 / total as f64 * 100.0),
            None => format!("{:.1} MB loaded", self.loaded as f64 / (1024.0 * 1024.0)),
        }
    }
}

/// Decoded RGBA preview pixels
#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub size: [usize; 2],
    pub rgba: Vec<u8>,
}

/// Assets stored in a local directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    candidates: Vec<String>,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, candidates: Vec<String>) -> Self {
        Self {
            root: root.into(),
            candidates,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn descriptor_path(&self, scene_id: &str) -> PathBuf {
        self.root.join(format!("{}.json", scene_id))
    }

    pub fn model_path(&self, scene_id: &str) -> PathBuf {
        self.root.join(format!("{}.glb", scene_id))
    }

    pub fn preview_path(&self, scene_id: &str) -> PathBuf {
        self.root.join(format!("{}.png", scene_id))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(constants::assets::MANIFEST_FILE)
    }

    fn read_manifest(&self) -> Option<Result<Vec<String>>> {
        let path = self.manifest_path();
        let text = fs::read_to_string(&path).ok()?;
        Some(
            serde_json::from_str::<Vec<String>>(&text)
                .map_err(|source| GalleryError::ManifestParse { path, source }),
        )
    }

    /// Keeps the candidate IDs whose descriptor reads and parses, along with
    /// the parsed descriptor
    fn scan_candidates(&self) -> Vec<CatalogEntry> {
        self.candidates
            .iter()
            .filter_map(|id| match self.fetch_descriptor(id) {
                Ok(descriptor) => {
                    debug!("Found scene {}", id);
                    Some(CatalogEntry {
                        id: id.clone(),
                        descriptor: Some(descriptor),
                    })
                }
                Err(err) => {
                    debug!("Scene {} not available: {}", id, err);
                    None
                }
            })
            .collect()
    }
}

impl SceneCatalog for DirectorySource {
    fn list_scenes(&self) -> Vec<CatalogEntry> {
        match self.read_manifest() {
            Some(Ok(ids)) => {
                info!("Using scene manifest {}", self.manifest_path().display());
                ids.into_iter()
                    .map(|id| CatalogEntry { id, descriptor: None })
                    .collect()
            }
            Some(Err(err)) => {
                warn!("{}; probing candidate IDs instead", err);
                self.scan_candidates()
            }
            None => self.scan_candidates(),
        }
    }
}

impl AssetSource for DirectorySource {
    fn fetch_descriptor(&self, scene_id: &str) -> Result<SceneDescriptor> {
        let path = self.descriptor_path(scene_id);
        let text = fs::read_to_string(&path).map_err(|source| GalleryError::DescriptorRead {
            path: path.clone(),
            source,
        })?;
        SceneDescriptor::from_json(&text)
            .map_err(|source| GalleryError::DescriptorParse { path, source })
    }

    fn fetch_model(&self, scene_id: &str) -> Result<Vec<u8>> {
        let path = self.model_path(scene_id);
        fs::read(&path).map_err(|source| GalleryError::ModelRead { path, source })
    }

    fn fetch_model_with_progress(
        &self,
        scene_id: &str,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<Vec<u8>> {
        let path = self.model_path(scene_id);
        let read_error = |source: std::io::Error| GalleryError::ModelRead {
            path: path.clone(),
            source,
        };

        let mut file = fs::File::open(&path).map_err(read_error)?;
        let total = file.metadata().ok().map(|metadata| metadata.len());
        let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
        let mut chunk = vec![0u8; constants::assets::MODEL_READ_CHUNK];
        loop {
            let read = match file.read(&mut chunk) {
                Ok(0) => break,
                Ok(read) => read,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(read_error(err)),
            };
            bytes.extend_from_slice(&chunk[..read]);
            progress(LoadProgress {
                loaded: bytes.len() as u64,
                total,
            });
        }
        Ok(bytes)
    }

    fn fetch_preview(&self, scene_id: &str) -> Result<PreviewImage> {
        let path = self.preview_path(scene_id);
        let image = image::open(&path)
            .map_err(|source| GalleryError::PreviewDecode { path, source })?
            .to_rgba8();
        let size = [image.width() as usize, image.height() as usize];
        Ok(PreviewImage {
            size,
            rgba: image.into_raw(),
        })
    }
}

/// Summaries for every listed scene whose descriptor loads, in listing order.
/// Each descriptor is read once: listed descriptors are reused, the rest fetched.
pub fn discover_scenes(source: &dyn AssetSource) -> Vec<SceneSummary> {
    let scenes: Vec<SceneSummary> = source
        .list_scenes()
        .into_iter()
        .map(|CatalogEntry { id, descriptor }| {
            let descriptor = match descriptor {
                Some(descriptor) => Ok(descriptor),
                None => source.fetch_descriptor(&id),
            };
            (id, descriptor)
        })
        .filter_map(|(id, descriptor)| match descriptor {
            Ok(descriptor) => {
                info!("✓ Found scene {}", id);
                Some(SceneSummary::new(&id, descriptor.task()))
            }
            Err(err) => {
                warn!("✗ Scene {} skipped: {}", id, err);
                None
            }
        })
        .collect();
    info!("Total scenes detected: {}", scenes.len());
    scenes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Directory source that counts descriptor fetches made through it
    struct CountingSource {
        inner: DirectorySource,
        descriptor_fetches: AtomicUsize,
    }

    impl SceneCatalog for CountingSource {
        fn list_scenes(&self) -> Vec<CatalogEntry> {
            self.inner.list_scenes()
        }
    }

    impl AssetSource for CountingSource {
        fn fetch_descriptor(&self, scene_id: &str) -> Result<SceneDescriptor> {
            self.descriptor_fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_descriptor(scene_id)
        }

        fn fetch_model(&self, scene_id: &str) -> Result<Vec<u8>> {
            self.inner.fetch_model(scene_id)
        }

        fn fetch_preview(&self, scene_id: &str) -> Result<PreviewImage> {
            self.inner.fetch_preview(scene_id)
        }
    }

    fn write_descriptor(root: &Path, id: &str, task: &str) {
        let json = serde_json::json!({ "input_task_description": { "Task": task } });
        fs::write(root.join(format!("{}.json", id)), json.to_string()).unwrap();
    }

    #[test]
    fn test_progress_labels() {
        let known = LoadProgress {
            loaded: 425,
            total: Some(1000),
        };
        assert_eq!(known.label(), "42.5% loaded");

        let unknown = LoadProgress {
            loaded: 3 * 1024 * 1024 + 200 * 1024,
            total: None,
        };
        assert_eq!(unknown.label(), "3.2 MB loaded");

        let empty = LoadProgress {
            loaded: 0,
            total: Some(0),
        };
        assert_eq!(empty.label(), "0.0 MB loaded");
    }

    #[test]
    fn test_model_read_reports_progress() {
        let dir = tempfile::tempdir().unwrap();
        let size = constants::assets::MODEL_READ_CHUNK * 2 + 10;
        fs::write(dir.path().join("001.glb"), vec![7u8; size]).unwrap();
        let source = DirectorySource::new(dir.path(), vec![]);

        let mut reports = Vec::new();
        let bytes = source
            .fetch_model_with_progress("001", &mut |progress| reports.push(progress))
            .unwrap();
        assert_eq!(bytes.len(), size);
        assert!(reports.len() >= 3);
        assert!(reports.windows(2).all(|w| w[0].loaded < w[1].loaded));
        let last = reports.last().unwrap();
        assert_eq!(last.loaded, size as u64);
        assert_eq!(last.total, Some(size as u64));
        assert_eq!(last.label(), "100.0% loaded");

        assert!(matches!(
            source.fetch_model_with_progress("002", &mut |_| {}),
            Err(GalleryError::ModelRead { .. })
        ));
    }

    #[test]
    fn test_scanned_descriptors_are_not_fetched_again() {
        let dir = tempfile::tempdir().unwrap();
        write_descriptor(dir.path(), "001", "Set up the desk");
        write_descriptor(dir.path(), "002", "Make tea");
        let source = CountingSource {
            inner: DirectorySource::new(dir.path(), vec!["001".into(), "002".into(), "003".into()]),
            descriptor_fetches: AtomicUsize::new(0),
        };

        let scenes = discover_scenes(&source);
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[1].description, "Make tea");
        assert_eq!(source.descriptor_fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_manifest_scenes_are_fetched_once() {
        let dir = tempfile::tempdir().unwrap();
        write_descriptor(dir.path(), "001", "Set up the desk");
        write_descriptor(dir.path(), "002", "Make tea");
        fs::write(dir.path().join("manifest.json"), r#"["002", "001", "009"]"#).unwrap();
        let source = CountingSource {
            inner: DirectorySource::new(dir.path(), vec![]),
            descriptor_fetches: AtomicUsize::new(0),
        };

        let scenes = discover_scenes(&source);
        let ids: Vec<&str> = scenes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["002", "001"]);
        assert_eq!(source.descriptor_fetches.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_paths_follow_scene_id() {
        let source = DirectorySource::new("assets/gallery", vec![]);
        assert_eq!(
            source.descriptor_path("003"),
            Path::new("assets/gallery/003.json")
        );
        assert_eq!(source.model_path("003"), Path::new("assets/gallery/003.glb"));
        assert_eq!(source.preview_path("003"), Path::new("assets/gallery/003.png"));
    }

    #[test]
    fn test_missing_descriptor_is_read_error() {
        let source = DirectorySource::new("/nonexistent/gallery", vec!["001".into()]);
        assert!(matches!(
            source.fetch_descriptor("001"),
            Err(GalleryError::DescriptorRead { .. })
        ));
        assert!(source.list_scene_ids().is_empty());
    }
}
