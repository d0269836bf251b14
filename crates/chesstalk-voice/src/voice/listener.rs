use crate::events::VoiceEvent;

/// Recognition lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    /// No speech input available. Manual controls keep working.
    Disabled,
    Idle,
    Listening,
    /// A result or error has been handed to the dispatcher.
    Processing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerTrigger {
    StartRequested,
    StopRequested,
    ResultReceived(String),
    ErrorReceived(String),
    ProcessingFinished,
}

impl ListenerTrigger {
    /// Trigger for an event coming from the recognizer. Start/stop notices carry none.
    pub fn from_event(event: VoiceEvent) -> Option<Self> {
        match event {
            VoiceEvent::TranscriptReady(text) => Some(ListenerTrigger::ResultReceived(text)),
            VoiceEvent::RecognitionError(code) => Some(ListenerTrigger::ErrorReceived(code)),
            VoiceEvent::ListeningStarted | VoiceEvent::ListeningStopped => None,
        }
    }
}

/// What the owner of the recognizer should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerAction {
    StartRecognition,
    StopRecognition,
    Dispatch(String),
    ReportError(String),
    Unsupported,
}

/// Whether to go back to listening once a command has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelistenPolicy {
    /// Listen again after every result or error until a stop is requested.
    #[default]
    UntilStopped,
    /// Each listening session captures one command.
    Once,
}

impl RelistenPolicy {
    pub fn from_flag(auto_relisten: bool) -> Self {
        if auto_relisten {
            RelistenPolicy::UntilStopped
        } else {
            RelistenPolicy::Once
        }
    }
}

/// Speech-recognition lifecycle as an explicit state machine.
///
/// Only one result is processed at a time: results arriving while a command is
/// being handled are dropped.
#[derive(Debug, Clone)]
pub struct VoiceListener {
    state: ListenerState,
    policy: RelistenPolicy,
    stop_requested: bool,
}

impl VoiceListener {
    pub fn new(policy: RelistenPolicy) -> Self {
        Self {
            state: ListenerState::Idle,
            policy,
            stop_requested: false,
        }
    }

    /// Listener for a host without speech input.
    pub fn disabled() -> Self {
        Self {
            state: ListenerState::Disabled,
            policy: RelistenPolicy::Once,
            stop_requested: false,
        }
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    pub fn policy(&self) -> RelistenPolicy {
        self.policy
    }

    pub fn handle(&mut self, trigger: ListenerTrigger) -> Vec<ListenerAction> {
        use ListenerAction as A;
        use ListenerState as S;
        use ListenerTrigger as T;

        let (next, actions) = match (self.state, trigger) {
            (S::Disabled, T::StartRequested | T::ResultReceived(_) | T::ErrorReceived(_)) => {
                (S::Disabled, vec![A::Unsupported])
            }
            (S::Disabled, _) => (S::Disabled, vec![]),

            (S::Idle, T::StartRequested) => {
                self.stop_requested = false;
                (S::Listening, vec![A::StartRecognition])
            }
            (S::Idle, T::ResultReceived(text)) => {
                tracing::debug!("Dropping result while idle: {text}");
                (S::Idle, vec![])
            }
            (S::Idle, _) => (S::Idle, vec![]),

            (S::Listening, T::StopRequested) => (S::Idle, vec![A::StopRecognition]),
            (S::Listening, T::ResultReceived(text)) => (S::Processing, vec![A::Dispatch(text)]),
            (S::Listening, T::ErrorReceived(code)) => {
                (S::Processing, vec![A::ReportError(code)])
            }
            (S::Listening, _) => (S::Listening, vec![]),

            (S::Processing, T::StopRequested) => {
                self.stop_requested = true;
                (S::Processing, vec![])
            }
            (S::Processing, T::StartRequested) => {
                self.stop_requested = false;
                (S::Processing, vec![])
            }
            (S::Processing, T::ProcessingFinished) => {
                if self.policy == RelistenPolicy::UntilStopped && !self.stop_requested {
                    (S::Listening, vec![A::StartRecognition])
                } else {
                    self.stop_requested = false;
                    (S::Idle, vec![])
                }
            }
            (S::Processing, T::ResultReceived(text)) => {
                tracing::warn!("Dropping result while processing: {text}");
                (S::Processing, vec![])
            }
            (S::Processing, T::ErrorReceived(code)) => {
                tracing::warn!("Dropping recognition error while processing: {code}");
                (S::Processing, vec![])
            }
        };

        if next != self.state {
            tracing::debug!("Listener {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        actions
    }
}
