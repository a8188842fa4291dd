use crate::foundation::error::{EngineError, EngineResult};
use crate::media::platform::{MediaElement, PlayFailure};
use crate::media::source::StreamingVideoSource;
use crate::runtime::timer::{TimerHost, TimerId};

/// Hover preview state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverState {
    /// Not hovered, or preview disabled.
    Idle,
    /// Hovered while the source (or a thumbnail seek on it) was busy; starts on `resume`.
    Deferred,
    /// Playing from the start position with a re-seek timer armed.
    Previewing {
        /// Re-seek timer armed for this preview.
        timer: TimerId,
    },
}

/// Drives short looping previews while the pointer is over a video tile.
///
/// The loop is a recurring timer that seeks back to the start position and resumes, not a
/// native loop, so the preview window stays bounded even for long videos.
#[derive(Clone, Debug)]
pub struct HoverPreviewController {
    start_sec: f64,
    loop_period_ms: u64,
    state: HoverState,
    disabled: bool,
}

impl HoverPreviewController {
    /// Idle controller looping from `start_sec` every `loop_period_ms`.
    pub fn new(start_sec: f64, loop_period_ms: u64) -> Self {
        Self {
            start_sec: start_sec.max(0.0),
            loop_period_ms: loop_period_ms.max(1),
            state: HoverState::Idle,
            disabled: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> HoverState {
        self.state
    }

    /// Position previews start from and leaves reset to, in seconds.
    pub fn start_sec(&self) -> f64 {
        self.start_sec
    }

    /// Whether a preview is playing.
    pub fn is_previewing(&self) -> bool {
        matches!(self.state, HoverState::Previewing { .. })
    }

    /// Whether a playback error switched previews off for good.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Pointer entered. Starts the preview when `ready`, otherwise defers it.
    /// Returns whether playback started.
    pub fn enter<E: MediaElement>(
        &mut self,
        source: &mut StreamingVideoSource<E>,
        timers: &mut dyn TimerHost,
        ready: bool,
    ) -> bool {
        if self.disabled || self.is_previewing() {
            return false;
        }
        if !ready || !source.is_ready() {
            self.state = HoverState::Deferred;
            tracing::debug!("hover preview deferred until the source is ready");
            return false;
        }
        self.begin(source, timers);
        true
    }

    /// Start a deferred preview once the source became available.
    pub fn resume<E: MediaElement>(
        &mut self,
        source: &mut StreamingVideoSource<E>,
        timers: &mut dyn TimerHost,
    ) -> bool {
        if self.state != HoverState::Deferred || self.disabled || !source.is_ready() {
            return false;
        }
        self.begin(source, timers);
        true
    }

    /// Pointer left. Returns whether a running preview was stopped.
    pub fn leave<E: MediaElement>(
        &mut self,
        source: &mut StreamingVideoSource<E>,
        timers: &mut dyn TimerHost,
    ) -> bool {
        match self.state {
            HoverState::Idle => false,
            HoverState::Deferred => {
                self.state = HoverState::Idle;
                false
            }
            HoverState::Previewing { timer } => {
                timers.clear_interval(timer);
                let element = source.element_mut();
                element.pause();
                element.seek(self.start_sec);
                self.state = HoverState::Idle;
                true
            }
        }
    }

    /// Re-seek tick. Returns whether `timer` belonged to the running preview.
    pub fn on_timer<E: MediaElement>(
        &mut self,
        timer: TimerId,
        source: &mut StreamingVideoSource<E>,
    ) -> bool {
        match self.state {
            HoverState::Previewing { timer: armed } if armed == timer => {
                let element = source.element_mut();
                element.seek(self.start_sec);
                element.play();
                true
            }
            _ => false,
        }
    }

    /// A play request settled unsuccessfully.
    ///
    /// Interruptions caused by pausing are expected and swallowed. Any other failure stops
    /// the preview, disables it and is returned.
    pub fn on_play_failed<E: MediaElement>(
        &mut self,
        failure: PlayFailure,
        source: &mut StreamingVideoSource<E>,
        timers: &mut dyn TimerHost,
    ) -> EngineResult<()> {
        let err = EngineError::from(failure);
        if err.is_expected() {
            tracing::debug!(error = %err, "hover play interrupted");
            return Ok(());
        }
        tracing::warn!(error = %err, "hover preview disabled");
        self.leave(source, timers);
        self.disabled = true;
        Err(err)
    }

    /// Drop any armed timer without touching the element.
    pub fn cancel(&mut self, timers: &mut dyn TimerHost) {
        if let HoverState::Previewing { timer } = self.state {
            timers.clear_interval(timer);
        }
        self.state = HoverState::Idle;
    }

    fn begin<E: MediaElement>(
        &mut self,
        source: &mut StreamingVideoSource<E>,
        timers: &mut dyn TimerHost,
    ) {
        let element = source.element_mut();
        element.seek(self.start_sec);
        element.play();
        let timer = timers.set_interval(self.loop_period_ms);
        self.state = HoverState::Previewing { timer };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/hover.rs"]
mod tests;
