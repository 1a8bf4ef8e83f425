//! Worker-thread texture loading with channel-based result delivery.

use std::path::PathBuf;
use std::thread::JoinHandle;

use orrery_materials::TextureSlot;

use crate::error::AssetError;

/// A bitmap decoded to tightly packed RGBA8.
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    /// Decode a file from disk. Runs on a worker thread.
    fn load(path: &PathBuf) -> Result<Self, AssetError> {
        let bytes = std::fs::read(path).map_err(|source| AssetError::Read {
            path: path.clone(),
            source,
        })?;
        let image = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
            path: path.clone(),
            source,
        })?;
        let rgba = image.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

struct LoadRequest {
    slot: TextureSlot,
    path: PathBuf,
}

/// The outcome of one texture request, delivered over the result channel.
#[derive(Debug)]
pub struct TextureLoadResult {
    pub slot: TextureSlot,
    pub result: Result<DecodedImage, AssetError>,
}

/// Background texture loader.
///
/// The event-loop thread submits requests via [`request`](Self::request) and
/// drains completions each frame via [`drain_results`](Self::drain_results).
/// Workers only read and decode; all GPU and scene mutation stays on the
/// event-loop thread. Completions arrive in any order. No retry, no
/// cancellation, no timeout.
pub struct AssetLoader {
    request_sender: Option<crossbeam_channel::Sender<LoadRequest>>,
    result_receiver: crossbeam_channel::Receiver<TextureLoadResult>,
    worker_handles: Vec<JoinHandle<()>>,
}

impl AssetLoader {
    /// Spawn `worker_count` decode threads.
    pub fn new(worker_count: usize) -> Self {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<LoadRequest>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        let mut handles = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            let rx = request_rx.clone();
            let tx = result_tx.clone();

            handles.push(std::thread::spawn(move || {
                while let Ok(request) = rx.recv() {
                    let result = DecodedImage::load(&request.path);
                    if let Err(error) = &result {
                        tracing::warn!(slot = request.slot.key(), %error, "texture load failed");
                    }
                    let _ = tx.send(TextureLoadResult {
                        slot: request.slot,
                        result,
                    });
                }
            }));
        }

        Self {
            request_sender: Some(request_tx),
            result_receiver: result_rx,
            worker_handles: handles,
        }
    }

    /// Queue a texture for loading. Returns `false` after shutdown.
    pub fn request(&self, slot: TextureSlot, path: PathBuf) -> bool {
        match &self.request_sender {
            Some(sender) => sender.send(LoadRequest { slot, path }).is_ok(),
            None => false,
        }
    }

    /// Drain all completed loads. Called once per frame on the event-loop
    /// thread; never blocks.
    pub fn drain_results(&self) -> Vec<TextureLoadResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.result_receiver.try_recv() {
            results.push(result);
        }
        results
    }

    /// Shut down all worker threads gracefully.
    ///
    /// Drops the request sender to signal workers to exit, then joins them.
    pub fn shutdown(&mut self) {
        self.request_sender.take();
        for handle in self.worker_handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for AssetLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_png(dir: &std::path::Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();
        path
    }

    fn wait_for_results(loader: &AssetLoader, count: usize) -> Vec<TextureLoadResult> {
        let mut results = Vec::new();
        let start = std::time::Instant::now();
        while results.len() < count {
            results.extend(loader.drain_results());
            assert!(
                start.elapsed().as_secs() < 5,
                "Timed out waiting for load results"
            );
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        results
    }

    #[test]
    fn test_successful_load_arrives_via_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_png(dir.path(), "color.png", 4, 2);

        let loader = AssetLoader::new(1);
        assert!(loader.request(TextureSlot::ColorMap, path));

        let results = wait_for_results(&loader, 1);
        assert_eq!(results[0].slot, TextureSlot::ColorMap);
        let image = results[0].result.as_ref().unwrap();
        assert_eq!((image.width, image.height), (4, 2));
        assert_eq!(image.rgba.len(), 4 * 2 * 4);
    }

    #[test]
    fn test_missing_file_delivers_failure() {
        let loader = AssetLoader::new(1);
        assert!(loader.request(
            TextureSlot::BumpMap,
            PathBuf::from("/nonexistent/bump.jpg")
        ));

        let results = wait_for_results(&loader, 1);
        assert_eq!(results[0].slot, TextureSlot::BumpMap);
        assert!(matches!(
            results[0].result,
            Err(AssetError::Read { .. })
        ));
    }

    #[test]
    fn test_corrupt_file_delivers_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"this is not a png").unwrap();

        let loader = AssetLoader::new(1);
        assert!(loader.request(TextureSlot::CloudMap, path));

        let results = wait_for_results(&loader, 1);
        assert!(matches!(
            results[0].result,
            Err(AssetError::Decode { .. })
        ));
    }

    #[test]
    fn test_concurrent_loads_all_arrive() {
        let dir = tempfile::tempdir().unwrap();
        let loader = AssetLoader::new(4);

        let slots = [
            TextureSlot::ColorMap,
            TextureSlot::BumpMap,
            TextureSlot::SpecularMap,
            TextureSlot::CloudMap,
            TextureSlot::CloudAlphaMap,
        ];
        for slot in slots {
            let path = write_test_png(dir.path(), &format!("{}.png", slot.key()), 2, 2);
            assert!(loader.request(slot, path));
        }

        let results = wait_for_results(&loader, slots.len());
        let mut seen: Vec<&str> = results.iter().map(|r| r.slot.key()).collect();
        seen.sort_unstable();
        let mut expected: Vec<&str> = slots.iter().map(|s| s.key()).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_request_after_shutdown_refused() {
        let mut loader = AssetLoader::new(1);
        loader.shutdown();
        assert!(!loader.request(TextureSlot::ColorMap, PathBuf::from("x.png")));
    }
}
