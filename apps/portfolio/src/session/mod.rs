//! Page session: the visitor-side state of one page view.
//!
//! A `PageSession` owns the interaction counters, the personalization
//! trigger and the active ContentRecord. Nothing here is global: each
//! session is independent and dies with its owner.
//!
//! Trigger check-and-set happens under the session lock, which is never held
//! across an `.await`, so two events can never both start a personalization
//! call.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::content::{default_content, ContentRecord, ContentShapeError};
use crate::personalization::flow::PersonalizedPage;
use crate::personalization::{InteractionSnapshot, PersonalizeContentInput};
use crate::render::render_page;

pub mod contact_form;
pub mod tracker;
pub mod transport;
pub mod trigger;

use tracker::{InteractionCounters, InteractionTracker};
use trigger::PersonalizationTrigger;

/// Interactions (scrolls + clicks) a session must exceed before it asks for
/// personalization.
pub const DEFAULT_TRIGGER_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub trigger_threshold: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            trigger_threshold: DEFAULT_TRIGGER_THRESHOLD,
        }
    }
}

#[derive(Debug, Error)]
pub enum PersonalizationError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("personalization endpoint returned status {0}")]
    Status(u16),

    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("personalized content rejected: {0}")]
    Shape(#[from] ContentShapeError),
}

/// The caller-side view of the personalization service. Implementations must
/// validate the returned record before handing it back.
#[async_trait]
pub trait Personalizer: Send + Sync {
    async fn personalize(
        &self,
        request: &PersonalizeContentInput,
    ) -> Result<PersonalizedPage, PersonalizationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonalizationOutcome {
    /// The active content was replaced wholesale.
    Applied { reasoning: String },
    /// Nothing changed; the session keeps its current content.
    Unavailable,
}

/// An armed personalization request. Only the session whose trigger fired
/// hands one out, and `PageSession::personalize` consumes it, so a session
/// adopts personalized content at most once.
#[derive(Debug)]
#[must_use = "the trigger stays in flight until this is passed to `personalize`"]
pub struct PendingPersonalization {
    session_id: Uuid,
    request: PersonalizeContentInput,
}

impl PendingPersonalization {
    pub fn request(&self) -> &PersonalizeContentInput {
        &self.request
    }
}

struct SessionState {
    tracker: InteractionTracker,
    trigger: PersonalizationTrigger,
    content: ContentRecord,
}

pub struct PageSession {
    id: Uuid,
    started_at: Instant,
    personalizer: Arc<dyn Personalizer>,
    state: Mutex<SessionState>,
}

impl PageSession {
    /// Starts a session on the default page copy.
    pub fn new(config: SessionConfig, personalizer: Arc<dyn Personalizer>) -> Self {
        Self::with_content(config, default_content(), personalizer)
    }

    pub fn with_content(
        config: SessionConfig,
        content: ContentRecord,
        personalizer: Arc<dyn Personalizer>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Instant::now(),
            personalizer,
            state: Mutex::new(SessionState {
                tracker: InteractionTracker::new(),
                trigger: PersonalizationTrigger::new(config.trigger_threshold),
                content,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Records a scroll event. Returns the pending request when this event is
    /// the one that arms the trigger.
    pub fn record_scroll(&self, scroll_depth: f64) -> Option<PendingPersonalization> {
        let mut state = self.lock();
        state.tracker.record_scroll(scroll_depth);
        self.evaluate_locked(&mut state)
    }

    /// Records a click event. See `record_scroll`.
    pub fn record_click(&self) -> Option<PendingPersonalization> {
        let mut state = self.lock();
        state.tracker.record_click();
        self.evaluate_locked(&mut state)
    }

    /// Re-runs the trigger without recording anything.
    pub fn evaluate(&self) -> Option<PendingPersonalization> {
        let mut state = self.lock();
        self.evaluate_locked(&mut state)
    }

    /// Sends an armed request and applies the result: full replacement on
    /// success, no change on any failure. A request armed by another session
    /// is refused without touching this one.
    pub async fn personalize(&self, pending: PendingPersonalization) -> PersonalizationOutcome {
        if pending.session_id != self.id {
            warn!(
                session_id = %self.id,
                armed_by = %pending.session_id,
                "Ignoring a personalization request armed by another session"
            );
            return PersonalizationOutcome::Unavailable;
        }

        let result = self.personalizer.personalize(&pending.request).await;

        let mut state = self.lock();
        state.trigger.complete();

        match result {
            Ok(page) => {
                state.content = page.content;
                info!(session_id = %self.id, "Personalized content applied");
                PersonalizationOutcome::Applied {
                    reasoning: page.reasoning,
                }
            }
            Err(e) => {
                warn!(session_id = %self.id, "Personalization unavailable, keeping current content: {e}");
                PersonalizationOutcome::Unavailable
            }
        }
    }

    /// Records a scroll and, if that arms the trigger, runs personalization
    /// to completion.
    pub async fn observe_scroll(&self, scroll_depth: f64) -> Option<PersonalizationOutcome> {
        let request = self.record_scroll(scroll_depth)?;
        Some(self.personalize(request).await)
    }

    /// Records a click and, if that arms the trigger, runs personalization
    /// to completion.
    pub async fn observe_click(&self) -> Option<PersonalizationOutcome> {
        let request = self.record_click()?;
        Some(self.personalize(request).await)
    }

    pub fn content(&self) -> ContentRecord {
        self.lock().content.clone()
    }

    pub fn counters(&self) -> InteractionCounters {
        self.lock().tracker.counters()
    }

    pub fn has_fired(&self) -> bool {
        self.lock().trigger.has_fired()
    }

    pub fn is_personalizing(&self) -> bool {
        self.lock().trigger.is_in_flight()
    }

    /// Renders the page for whichever record is active right now.
    pub fn render(&self) -> String {
        render_page(&self.lock().content)
    }

    fn evaluate_locked(&self, state: &mut SessionState) -> Option<PendingPersonalization> {
        let counters = state.tracker.counters();
        if !state.trigger.evaluate(&counters) {
            return None;
        }

        let snapshot = InteractionSnapshot {
            scroll_depth: state.tracker.scroll_depth(),
            clicks: counters.click_count,
            time_on_page: self.started_at.elapsed().as_secs_f64() * 1000.0,
        };

        let encoded = serde_json::to_string(&snapshot)
            .and_then(|interaction_data| {
                state.content.to_json().map(|current_content| PersonalizeContentInput {
                    interaction_data,
                    current_content,
                })
            });

        match encoded {
            Ok(request) => {
                info!(
                    session_id = %self.id,
                    scrolls = counters.scroll_count,
                    clicks = counters.click_count,
                    "Personalization triggered"
                );
                Some(PendingPersonalization {
                    session_id: self.id,
                    request,
                })
            }
            Err(e) => {
                // Already fired; the session simply stays on its current copy.
                warn!(session_id = %self.id, "Could not encode personalization request: {e}");
                state.trigger.complete();
                None
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Personalizer that counts calls and replays a fixed result.
    struct ScriptedPersonalizer {
        calls: AtomicUsize,
        reply: Option<ContentRecord>,
    }

    impl ScriptedPersonalizer {
        fn returning(reply: Option<ContentRecord>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Personalizer for ScriptedPersonalizer {
        async fn personalize(
            &self,
            _request: &PersonalizeContentInput,
        ) -> Result<PersonalizedPage, PersonalizationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Some(content) => Ok(PersonalizedPage {
                    content: content.clone(),
                    reasoning: "likes forensics".to_string(),
                }),
                None => Err(PersonalizationError::Status(503)),
            }
        }
    }

    fn rewritten() -> ContentRecord {
        let mut content = default_content();
        content.hero.title = "forensics, first.".to_string();
        content.skills.skillset.reverse();
        content
    }

    #[test]
    fn test_sixth_interaction_arms_the_trigger() {
        let session = PageSession::new(
            SessionConfig::default(),
            ScriptedPersonalizer::returning(None),
        );

        for _ in 0..3 {
            assert!(session.record_scroll(0.2).is_none());
        }
        for _ in 0..2 {
            assert!(session.record_click().is_none());
        }
        let pending = session.record_click().expect("sixth interaction fires");
        let request = pending.request();

        let snapshot: InteractionSnapshot =
            serde_json::from_str(&request.interaction_data).unwrap();
        assert_eq!(snapshot.clicks, 3);
        assert_eq!(snapshot.scroll_depth, 0.2);
        assert!(snapshot.time_on_page >= 0.0);
        assert_eq!(
            ContentRecord::from_json(&request.current_content).unwrap(),
            default_content()
        );
        assert!(session.is_personalizing());
    }

    #[test]
    fn test_no_second_request_while_in_flight_or_after() {
        let session = PageSession::new(
            SessionConfig::default(),
            ScriptedPersonalizer::returning(None),
        );
        let fired: usize = (0..40)
            .filter_map(|i| {
                if i % 2 == 0 {
                    session.record_scroll(0.5)
                } else {
                    session.record_click()
                }
            })
            .count();
        assert_eq!(fired, 1);
        assert!(session.evaluate().is_none());
    }

    #[tokio::test]
    async fn test_success_replaces_content_wholesale() {
        let personalizer = ScriptedPersonalizer::returning(Some(rewritten()));
        let session = PageSession::new(SessionConfig::default(), personalizer.clone());

        let mut outcome = None;
        for _ in 0..6 {
            outcome = session.observe_scroll(0.9).await.or(outcome);
        }

        assert_eq!(
            outcome,
            Some(PersonalizationOutcome::Applied {
                reasoning: "likes forensics".to_string()
            })
        );
        assert_eq!(session.content(), rewritten());
        assert!(session.render().contains("forensics, first."));
        assert!(!session.is_personalizing());
        assert_eq!(personalizer.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_content_and_does_not_retry() {
        let personalizer = ScriptedPersonalizer::returning(None);
        let session = PageSession::new(SessionConfig::default(), personalizer.clone());
        let before = session.content();

        for _ in 0..20 {
            session.observe_click().await;
        }

        assert_eq!(session.content(), before);
        assert_eq!(personalizer.calls(), 1);
        assert!(session.has_fired());
        assert!(!session.is_personalizing());
    }

    #[tokio::test]
    async fn test_concurrent_events_start_one_call() {
        let personalizer = ScriptedPersonalizer::returning(Some(rewritten()));
        let session = Arc::new(PageSession::new(
            SessionConfig::default(),
            personalizer.clone(),
        ));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let session = Arc::clone(&session);
                tokio::spawn(async move { session.observe_click().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(personalizer.calls(), 1);
        assert_eq!(session.counters().click_count, 32);
    }

    #[tokio::test]
    async fn test_request_armed_elsewhere_is_refused() {
        let personalizer = ScriptedPersonalizer::returning(Some(rewritten()));
        let armed = PageSession::new(SessionConfig::default(), personalizer.clone());
        let other = PageSession::new(SessionConfig::default(), personalizer.clone());

        let pending = (0..6).find_map(|_| armed.record_click()).unwrap();
        let outcome = other.personalize(pending).await;

        assert_eq!(outcome, PersonalizationOutcome::Unavailable);
        assert_eq!(personalizer.calls(), 0);
        assert_eq!(other.content(), default_content());
        assert!(!other.has_fired());
        assert!(armed.is_personalizing());
    }

    #[tokio::test]
    async fn test_manual_personalize_adopts_once() {
        let personalizer = ScriptedPersonalizer::returning(Some(rewritten()));
        let session = PageSession::new(SessionConfig::default(), personalizer.clone());

        let pending = (0..6).find_map(|_| session.record_scroll(0.3)).unwrap();
        assert!(session.is_personalizing());

        let outcome = session.personalize(pending).await;

        assert!(matches!(outcome, PersonalizationOutcome::Applied { .. }));
        assert!(!session.is_personalizing());
        assert!((0..20).all(|_| session.record_click().is_none()));
        assert_eq!(personalizer.calls(), 1);
    }

    #[test]
    fn test_custom_threshold() {
        let session = PageSession::new(
            SessionConfig {
                trigger_threshold: 1,
            },
            ScriptedPersonalizer::returning(None),
        );
        assert!(session.record_click().is_none());
        assert!(session.record_click().is_some());
    }
}
