//! Translation provider adapters.

mod google_translate;
mod mock;

pub use google_translate::{GoogleTranslateConfig, GoogleTranslateProvider};
pub use mock::MockTranslationProvider;
