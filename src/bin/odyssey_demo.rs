//=========================================================================
// Odyssey Demo
//=========================================================================
//
// Loads everything under `./assets` behind a progress bar, then shows the
// decoded images on a scrollable gallery.
//
// Controls:
// - W/A/S/D: pan the camera
// - Mouse wheel: zoom
// - Escape: quit
//
// Run with `RUST_LOG=debug` to watch the loader and screen transitions.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use env_logger::Env;
use glam::Vec2;
use log::{info, warn};

//=== Internal Dependencies ===============================================

use odyssey_engine::core::resource::default_loaders;
use odyssey_engine::prelude::*;

//=== Configuration =======================================================

const ASSET_ROOT: &str = "assets";
const LOADING_BACKGROUND: &str = "ui/loading.png";
const RESOLUTION: (u32, u32) = (960, 540);

/// Gap between gallery images, in buffer pixels.
const GALLERY_GAP: u32 = 16;

/// Blink period of the "quit" hint, in milliseconds.
const HINT_BLINK_MS: f64 = 500.0;

//=== Gallery Screen ======================================================

struct Gallery {
    input: Arc<InputManager>,
    resources: ResourceLoader,
    screens: ScreenSwitch<&'static str>,
    canvas: SharedCanvas,
    camera: Option<Camera>,
    blink: Timer,
    hint_visible: Arc<AtomicBool>,
    quit: Option<SubscriptionId>,
}

impl Gallery {
    fn new(services: &EngineServices<&'static str>) -> Self {
        let hint_visible = Arc::new(AtomicBool::new(true));
        let blink = Timer::new(HINT_BLINK_MS).with_auto_repeat(true);
        let toggle = Arc::clone(&hint_visible);
        blink.on_timeout(move || {
            toggle.fetch_xor(true, Ordering::Relaxed);
        });

        Self {
            input: Arc::clone(&services.input),
            resources: services.resources.clone(),
            screens: services.screens.clone(),
            canvas: services.canvas.clone(),
            camera: None,
            blink,
            hint_visible,
            quit: None,
        }
    }

    /// Lays every loaded image out on one row of an oversized camera buffer.
    fn build_camera(&self) -> Camera {
        let canvas = self.canvas.snapshot();
        let (view_w, view_h) = canvas.target_size();

        let images = self
            .resources
            .store()
            .map(|store| gallery_images(&store))
            .unwrap_or_default();

        let width = images
            .iter()
            .map(|image| image.width() + GALLERY_GAP)
            .sum::<u32>()
            .max(view_w);
        let height = images
            .iter()
            .map(|image| image.height() + 2 * GALLERY_GAP)
            .max()
            .unwrap_or(0)
            .max(view_h);

        info!("Gallery holds {} images ({}x{})", images.len(), width, height);

        let mut camera = Camera::for_canvas(width, height, &canvas);
        camera.clear(Color::DARK_GRAY);

        let mut x = GALLERY_GAP;
        for image in images {
            let advance = image.width() + GALLERY_GAP;
            camera.render(&Sprite::new(image, Vec2::new(x as f32, GALLERY_GAP as f32)));
            x += advance;
        }
        camera
    }
}

/// Every decoded image in the store, in path order.
fn gallery_images(store: &ResourceStore) -> Vec<Arc<PixelBuffer>> {
    store
        .paths()
        .into_iter()
        .filter_map(|path| store.image(path))
        .collect()
}

impl Screen for Gallery {
    fn load(&mut self) {
        let mut camera = self.build_camera();
        camera.bind_input(Arc::clone(&self.input));
        self.camera = Some(camera);

        let screens = self.screens.clone();
        self.quit = Some(
            self.input
                .on_keyboard_event()
                .subscribe(KeyInputType::Press, move |event| {
                    if event.key == KeyCode::Escape {
                        screens.close_game();
                    }
                }),
        );
        self.blink.reset();
    }

    fn unload(&mut self) {
        self.camera = None;
        if let Some(id) = self.quit.take() {
            self.input
                .on_keyboard_event()
                .unsubscribe(KeyInputType::Press, id);
        }
    }

    fn update(&mut self, delta_time: f64) {
        if let Some(camera) = self.camera.as_mut() {
            camera.update(delta_time);
        }
        self.blink.update(delta_time);
    }

    fn draw(&mut self, renderer: &mut Renderer) {
        if let Some(camera) = &self.camera {
            renderer.draw(camera);
        }
        if self.hint_visible.load(Ordering::Relaxed) {
            let y = renderer.height().saturating_sub(12) as i32;
            renderer.fill_rect(8, y, 4, 4, Color::WHITE);
        }
    }
}

//=== Entry Point =========================================================

fn main() -> Result<(), EngineError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .filter_module("wgpu_hal", log::LevelFilter::Warn)
        .filter_module("naga", log::LevelFilter::Warn)
        .init();

    let source = DirectorySource::new(ASSET_ROOT);
    let early = EarlyAssets::load(&source, &default_loaders(), &[LOADING_BACKGROUND]);
    if early.is_empty() {
        warn!("No loading background at {}/{}", ASSET_ROOT, LOADING_BACKGROUND);
    }

    EngineBuilder::new()
        .with_title("Odyssey Demo")
        .with_resolution(RESOLUTION.0, RESOLUTION.1)
        .with_asset_source(source)
        .with_default_screen("loading", move |services| {
            LoadingScreen::new(
                services.resources.clone(),
                services.screens.clone(),
                "gallery",
                early,
            )
            .with_background(LOADING_BACKGROUND)
        })
        .with_screen("gallery", Gallery::new)
        .build()?
        .run()
}
