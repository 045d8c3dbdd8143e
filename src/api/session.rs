use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use keyflow_core::layout::{default_layout, parse_layout_toml};
use keyflow_core::settings::settings;
use keyflow_core::TimerId;
use keyflow_session::{KeyboardSession, SessionEvent};

use super::host::{
    ForeignPreview, ForeignScheduler, ForeignSurface, KfPreviewSurface, KfTextSurface, KfTimerHost,
};
use super::types::{
    convert_response, KfCandidate, KfError, KfKeyBounds, KfKeyFace, KfKeyId, KfResponse,
};

type HostSession = KeyboardSession<ForeignSurface, ForeignPreview, ForeignScheduler>;

/// One keyboard instance. All calls are expected on the host's UI thread;
/// the mutex only makes the object shareable across the boundary.
#[derive(uniffi::Object)]
pub struct KfSession {
    session: Mutex<HostSession>,
}

impl KfSession {
    pub(super) fn lock(&self) -> MutexGuard<'_, HostSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self, event: SessionEvent) -> KfResponse {
        convert_response(self.lock().handle(event))
    }
}

#[uniffi::export]
impl KfSession {
    /// `layout_toml` replaces the built-in layout when given.
    #[uniffi::constructor]
    pub(super) fn new(
        preview: Arc<dyn KfPreviewSurface>,
        timers: Arc<dyn KfTimerHost>,
        layout_toml: Option<String>,
    ) -> Result<Arc<Self>, KfError> {
        let layout = match layout_toml {
            Some(toml) => {
                parse_layout_toml(&toml).map_err(|e| KfError::InvalidData { msg: e.to_string() })?
            }
            None => default_layout().clone(),
        };
        let session = KeyboardSession::with_settings(
            settings(),
            layout,
            ForeignPreview(preview),
            ForeignScheduler(timers),
        );
        Ok(Arc::new(Self {
            session: Mutex::new(session),
        }))
    }

    fn attach(&self, surface: Arc<dyn KfTextSurface>) {
        self.lock().attach(ForeignSurface(surface));
    }

    fn detach(&self) {
        self.lock().detach();
    }

    fn set_screen_width(&self, width: f32) {
        self.lock().set_screen_width(width);
    }

    fn touch_down(&self, key: KfKeyId, bounds: KfKeyBounds) -> KfResponse {
        self.handle(SessionEvent::down(key.into(), bounds.into()))
    }

    fn touch_move(&self, key: KfKeyId, x: f32) -> KfResponse {
        self.handle(SessionEvent::moved(key.into(), x))
    }

    fn touch_up(&self, key: KfKeyId) -> KfResponse {
        self.handle(SessionEvent::up(key.into()))
    }

    fn touch_cancel(&self, key: KfKeyId) -> KfResponse {
        self.handle(SessionEvent::cancel(key.into()))
    }

    fn space(&self) -> KfResponse {
        self.handle(SessionEvent::Space)
    }

    fn delete(&self) -> KfResponse {
        self.handle(SessionEvent::Delete)
    }

    fn enter(&self) -> KfResponse {
        self.handle(SessionEvent::Enter)
    }

    fn toggle_shift(&self) -> KfResponse {
        self.handle(SessionEvent::ToggleShift)
    }

    fn is_shifted(&self) -> bool {
        self.lock().shift()
    }

    fn select_candidate(&self, index: u32) -> KfResponse {
        self.handle(SessionEvent::SelectCandidate(index as usize))
    }

    fn undo_join(&self) -> KfResponse {
        self.handle(SessionEvent::UndoJoin)
    }

    /// Deliver a timer scheduled through `KfTimerHost::schedule`.
    fn timer_fired(&self, timer: u64) -> KfResponse {
        self.handle(SessionEvent::TimerFired(TimerId::from_bits(timer)))
    }

    fn candidates(&self) -> Vec<KfCandidate> {
        self.lock()
            .candidates()
            .iter()
            .cloned()
            .map(KfCandidate::from)
            .collect()
    }

    /// Face label and corner hint for `key` under the current shift state.
    fn key_face(&self, key: KfKeyId) -> Option<KfKeyFace> {
        self.lock().key_face(key.into()).map(KfKeyFace::from)
    }

    /// Rows of the active layout, as key counts per row.
    fn row_lengths(&self) -> Vec<u32> {
        self.lock()
            .layout()
            .rows
            .iter()
            .map(|r| r.keys.len() as u32)
            .collect()
    }
}
