//=========================================================================
// Resource Loader
//=========================================================================
//
// Single-pass background loader with progress reporting.
//
// Threads:
// ```text
//   caller ──start_loading()──> spawns "resource-loader"
//                                   │ list → load each → count
//   loop thread                     │
//     files_loaded() / progress  <──┤ atomics + last_loaded (mutex)
//     store()                    <──┘ OnceLock, set before finish
//                                     finish.fire()  (loader thread)
// ```
//
// The store is private to the loader thread until it is published whole.
// Readers get `None` from `store()` until then, so they cannot observe a
// partially filled map.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use super::format::{default_loaders, load_asset, FormatLoader};
use super::{AssetSource, LoaderError, ResourceStore};
use crate::core::event::{Event, SubscriptionId};

//=== Shared State ========================================================

struct LoadPlan {
    source: Arc<dyn AssetSource>,
    loaders: Vec<Arc<dyn FormatLoader>>,
}

struct LoaderShared {
    plan: Mutex<Option<LoadPlan>>,
    files_count: AtomicUsize,
    files_loaded: AtomicUsize,
    last_loaded: Mutex<String>,
    store: OnceLock<Arc<ResourceStore>>,
    finish: Event,
    worker: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

//=== ResourceLoader ======================================================

/// Handle to the background asset loader.
///
/// Clones share the same loading pass.
///
/// # Examples
///
/// ```
/// use odyssey_engine::core::resource::{MemorySource, ResourceLoader};
///
/// let source = MemorySource::new().with_file("readme.txt", b"not an asset".to_vec());
/// let loader = ResourceLoader::new(source);
///
/// loader.start_loading().unwrap();
/// loader.wait();
///
/// assert!(loader.is_finished());
/// assert_eq!(loader.loading_progress_text(), "1/1");
/// assert!(loader.store().unwrap().is_empty());
/// ```
#[derive(Clone)]
pub struct ResourceLoader {
    shared: Arc<LoaderShared>,
}

impl ResourceLoader {
    //--- Construction -----------------------------------------------------

    /// Creates a loader over `source` with the built-in image and font
    /// loaders registered.
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self::with_loaders(Arc::new(source), default_loaders())
    }

    /// Creates a loader with an explicit loader list (registration order).
    pub fn with_loaders(source: Arc<dyn AssetSource>, loaders: Vec<Arc<dyn FormatLoader>>) -> Self {
        Self {
            shared: Arc::new(LoaderShared {
                plan: Mutex::new(Some(LoadPlan { source, loaders })),
                files_count: AtomicUsize::new(0),
                files_loaded: AtomicUsize::new(0),
                last_loaded: Mutex::new(String::new()),
                store: OnceLock::new(),
                finish: Event::new(),
                worker: Mutex::new(None),
            }),
        }
    }

    /// Appends a format loader, tried after those already registered.
    ///
    /// # Errors
    ///
    /// [`LoaderError::AlreadyStarted`] once loading has begun.
    pub fn register_loader(&self, loader: Arc<dyn FormatLoader>) -> Result<(), LoaderError> {
        match lock(&self.shared.plan).as_mut() {
            Some(plan) => {
                debug!("Registered format loader {}", loader.name());
                plan.loaders.push(loader);
                Ok(())
            }
            None => Err(LoaderError::AlreadyStarted),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Spawns the loader thread. Only the first call starts a pass.
    ///
    /// # Errors
    ///
    /// - [`LoaderError::AlreadyStarted`] on every call after the first
    /// - [`LoaderError::ThreadSpawn`] if the OS refuses a new thread
    pub fn start_loading(&self) -> Result<(), LoaderError> {
        let plan = lock(&self.shared.plan)
            .take()
            .ok_or(LoaderError::AlreadyStarted)?;

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name("resource-loader".into())
            .spawn(move || run_pass(&shared, plan))
            .map_err(LoaderError::ThreadSpawn)?;

        *lock(&self.shared.worker) = Some(handle);
        Ok(())
    }

    /// Blocks until the loader thread has exited. Returns immediately if
    /// loading was never started or was already waited on.
    pub fn wait(&self) {
        let handle = lock(&self.shared.worker).take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("Resource loader thread panicked");
            }
        }
    }

    //--- Signals ----------------------------------------------------------

    /// Subscribes to the one-shot finish signal.
    ///
    /// The callback runs on the loader thread. Subscribing after the pass
    /// finished never fires; check [`ResourceLoader::is_finished`].
    pub fn on_finish<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.shared.finish.subscribe(move |_| callback())
    }

    pub fn unsubscribe_finish(&self, id: SubscriptionId) -> bool {
        self.shared.finish.unsubscribe(id)
    }

    //--- Progress ---------------------------------------------------------

    pub fn is_finished(&self) -> bool {
        self.shared.store.get().is_some()
    }

    /// The completed store, once loading has finished.
    pub fn store(&self) -> Option<Arc<ResourceStore>> {
        self.shared.store.get().cloned()
    }

    /// Files discovered by this pass (0 until discovery completes).
    pub fn files_count(&self) -> usize {
        self.shared.files_count.load(Ordering::Acquire)
    }

    /// Files processed so far, whether decoded or skipped.
    pub fn files_loaded(&self) -> usize {
        self.shared.files_loaded.load(Ordering::Acquire)
    }

    /// Path of the most recently processed file (empty before the first).
    pub fn last_loaded_file(&self) -> String {
        lock(&self.shared.last_loaded).clone()
    }

    /// `"loaded/count"`, e.g. `"12/40"`.
    pub fn loading_progress_text(&self) -> String {
        format!("{}/{}", self.files_loaded(), self.files_count())
    }

    /// Percentage in `0..=100`.
    ///
    /// Computed as `loaded * 100 / count`, so progress advances per file.
    /// An empty pass reports 0 until finished, then 100.
    pub fn loading_progress(&self) -> u32 {
        let count = self.files_count();
        if count == 0 {
            return if self.is_finished() { 100 } else { 0 };
        }
        (self.files_loaded().min(count) * 100 / count) as u32
    }
}

//--- Loading Pass --------------------------------------------------------

fn run_pass(shared: &LoaderShared, plan: LoadPlan) {
    let started = Instant::now();

    let files = match plan.source.list() {
        Ok(files) => files,
        Err(e) => {
            error!("Asset discovery failed, nothing will be loaded: {}", e);
            Vec::new()
        }
    };
    shared.files_count.store(files.len(), Ordering::Release);
    info!("Loading {} asset files", files.len());

    let mut store = ResourceStore::default();
    for path in &files {
        if let Some(resource) = load_asset(plan.source.as_ref(), &plan.loaders, path) {
            store.insert(path, resource);
        }

        *lock(&shared.last_loaded) = path.clone();
        shared.files_loaded.fetch_add(1, Ordering::Release);
    }

    info!(
        "Resource loading finished: {} of {} files stored in {:?}",
        store.len(),
        files.len(),
        started.elapsed()
    );

    // Publish before signalling; finish subscribers read the store.
    let _ = shared.store.set(Arc::new(store));
    shared.finish.fire();
}

//--- Trait Implementations -----------------------------------------------

impl fmt::Debug for ResourceLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLoader")
            .field("progress", &self.loading_progress_text())
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resource::{LoadError, MemorySource, Resource};
    use crossbeam_channel::bounded;
    use std::sync::atomic::AtomicBool;

    //--- Test Loaders -----------------------------------------------------

    /// Claims `.json`, stores the byte length.
    struct JsonLength;

    impl FormatLoader for JsonLength {
        fn name(&self) -> &str {
            "JsonLength"
        }
        fn extensions(&self) -> &[&str] {
            &[".json", ".animation.json"]
        }
        fn decode(&self, _path: &str, bytes: &[u8]) -> Result<Resource, LoadError> {
            Ok(Resource::Custom(Arc::new(bytes.len())))
        }
    }

    /// Blocks each decode until the test releases it.
    struct Gated {
        gate: crossbeam_channel::Receiver<()>,
    }

    impl FormatLoader for Gated {
        fn name(&self) -> &str {
            "Gated"
        }
        fn extensions(&self) -> &[&str] {
            &[".bin"]
        }
        fn decode(&self, _path: &str, _bytes: &[u8]) -> Result<Resource, LoadError> {
            self.gate.recv().map_err(|e| LoadError::Decode(e.to_string()))?;
            Ok(Resource::Custom(Arc::new(())))
        }
    }

    fn font_bytes() -> Vec<u8> {
        b"OTTO-font-body".to_vec()
    }

    //=====================================================================
    // Pass Tests
    //=====================================================================

    #[test]
    fn pass_stores_matched_files_and_counts_all() {
        let source = MemorySource::new()
            .with_file("fonts/a.otf", font_bytes())
            .with_file("fonts/b.ttf", font_bytes())
            .with_file("notes/readme", b"x".to_vec())
            .with_file("data/level.txt", b"x".to_vec());
        let loader = ResourceLoader::new(source);
        let finished = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&finished);
        loader.on_finish(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        });

        loader.start_loading().unwrap();
        loader.wait();

        assert_eq!(loader.files_count(), 4);
        assert_eq!(loader.files_loaded(), 4);
        assert_eq!(finished.load(Ordering::SeqCst), 1);

        let store = loader.store().expect("store published after finish");
        assert!(store.font("fonts/a.otf").is_some());
        assert!(store.font("fonts/b.ttf").is_some());
        assert!(!store.contains("notes/readme"));
        assert!(!store.contains("data/level.txt"));
    }

    #[test]
    fn decode_failure_is_skipped_and_pass_continues() {
        let source = MemorySource::new()
            .with_file("a.ttf", b"garbage".to_vec())
            .with_file("b.ttf", font_bytes());
        let loader = ResourceLoader::new(source);

        loader.start_loading().unwrap();
        loader.wait();

        let store = loader.store().unwrap();
        assert!(!store.contains("a.ttf"));
        assert!(store.contains("b.ttf"));
        assert_eq!(loader.last_loaded_file(), "b.ttf");
    }

    #[test]
    fn registered_loader_claims_compound_extension() {
        let source = MemorySource::new().with_file("hero.animation.json", b"{}".to_vec());
        let loader = ResourceLoader::new(source);
        loader.register_loader(Arc::new(JsonLength)).unwrap();

        loader.start_loading().unwrap();
        loader.wait();

        let store = loader.store().unwrap();
        assert_eq!(store.custom::<usize>("hero.animation.json").as_deref(), Some(&2));
    }

    #[test]
    fn second_start_is_rejected() {
        let loader = ResourceLoader::new(MemorySource::new());

        loader.start_loading().unwrap();
        assert!(matches!(loader.start_loading(), Err(LoaderError::AlreadyStarted)));
        assert!(matches!(
            loader.register_loader(Arc::new(JsonLength)),
            Err(LoaderError::AlreadyStarted)
        ));
        loader.wait();
    }

    #[test]
    fn finish_fires_on_loader_thread() {
        let loader = ResourceLoader::new(MemorySource::new());
        let name = Arc::new(Mutex::new(None));
        let inner = Arc::clone(&name);
        loader.on_finish(move || {
            *inner.lock().unwrap() = thread::current().name().map(str::to_owned);
        });

        loader.start_loading().unwrap();
        loader.wait();

        assert_eq!(name.lock().unwrap().as_deref(), Some("resource-loader"));
    }

    #[test]
    fn store_is_visible_from_finish_callback() {
        let source = MemorySource::new().with_file("a.otf", font_bytes());
        let loader = ResourceLoader::new(source);
        let saw_store = Arc::new(AtomicBool::new(false));

        let observer = loader.clone();
        let inner = Arc::clone(&saw_store);
        loader.on_finish(move || {
            let has_font = observer.store().is_some_and(|s| s.contains("a.otf"));
            inner.store(has_font, Ordering::SeqCst);
        });

        loader.start_loading().unwrap();
        loader.wait();

        assert!(saw_store.load(Ordering::SeqCst));
    }

    //=====================================================================
    // Progress Tests
    //=====================================================================

    #[test]
    fn progress_advances_per_file() {
        let (release, gate) = bounded::<()>(0);
        let source = MemorySource::new()
            .with_file("1.bin", vec![])
            .with_file("2.bin", vec![])
            .with_file("3.bin", vec![])
            .with_file("4.bin", vec![]);
        let loader = ResourceLoader::with_loaders(Arc::new(source), vec![Arc::new(Gated { gate })]);

        assert_eq!(loader.loading_progress(), 0);
        loader.start_loading().unwrap();

        // Zero-capacity channel: each send returns once a decode took it.
        release.send(()).unwrap();
        release.send(()).unwrap();
        // The third decode blocks, so the count settles at two.
        while loader.files_loaded() < 2 {
            thread::yield_now();
        }
        assert_eq!(loader.files_loaded(), 2);
        assert_eq!(loader.loading_progress_text(), "2/4");
        assert_eq!(loader.loading_progress(), 50);
        assert!(!loader.is_finished());

        release.send(()).unwrap();
        release.send(()).unwrap();
        loader.wait();

        assert_eq!(loader.loading_progress(), 100);
        assert!(loader.is_finished());
    }

    #[test]
    fn empty_pass_reports_complete_after_finish() {
        let loader = ResourceLoader::new(MemorySource::new());
        assert_eq!(loader.loading_progress(), 0);

        loader.start_loading().unwrap();
        loader.wait();

        assert_eq!(loader.loading_progress_text(), "0/0");
        assert_eq!(loader.loading_progress(), 100);
    }

    #[test]
    fn wait_without_start_returns() {
        let loader = ResourceLoader::new(MemorySource::new());
        loader.wait();
        assert!(!loader.is_finished());
    }
}
