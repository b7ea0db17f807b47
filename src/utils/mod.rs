pub mod screenshot;

pub use screenshot::ScreenshotManager;
