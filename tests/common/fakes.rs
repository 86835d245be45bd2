//! Collaborators injected in place of the classifier and video search services.

use async_trait::async_trait;
use emotune_server::classifier::{ClassifierError, EmotionClassifier};
use emotune_server::video::{watch_url, ResolverError, VideoLinkResolver};
use emotune_server::Emotion;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Classifier whose next answer is controlled by the test.
///
/// `None` makes every call fail with an inference error.
pub struct ScriptedClassifier {
    next: Mutex<Option<Emotion>>,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    pub fn new(initial: Option<Emotion>) -> Self {
        Self {
            next: Mutex::new(initial),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, next: Option<Emotion>) {
        *self.next.lock().unwrap() = next;
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmotionClassifier for ScriptedClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<Emotion, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = *self.next.lock().unwrap();
        next.ok_or_else(|| ClassifierError::Inference("no face detected".to_string()))
    }
}

/// Resolver that links every song to a video id derived from its title.
pub struct StubResolver;

#[async_trait]
impl VideoLinkResolver for StubResolver {
    async fn resolve(&self, title: &str, _artist: &str) -> Result<Option<String>, ResolverError> {
        Ok(Some(watch_url(&title.replace(' ', "_"))))
    }
}
